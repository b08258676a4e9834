//! One named call per backend endpoint, as the web front-end uses them.

use eventreg_core::{
    Envelope, NewEvent, NewPayment, NewRegistration, NewSchedule, NewTalent, Record, Resource,
    UploadForm,
};
use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ClientError;

type Outcome<T = Record> = Result<Envelope<T>, ClientError>;

impl ApiClient {
    // users

    pub async fn get_all_users(&self) -> Outcome {
        self.list(Resource::Users).await
    }

    pub async fn update_users<T: Serialize + ?Sized + Sync>(&self, id: &str, user: &T) -> Outcome {
        self.update(Resource::Users, id, user).await
    }

    pub async fn delete_user(&self, id: &str) -> Outcome<()> {
        self.delete(Resource::Users, id).await
    }

    // talents

    pub async fn create_talents(&self, talent: &NewTalent) -> Outcome {
        self.create(Resource::Talents, talent).await
    }

    pub async fn get_all_talents(&self) -> Outcome {
        self.list(Resource::Talents).await
    }

    pub async fn update_talents<T: Serialize + ?Sized + Sync>(
        &self,
        id: &str,
        talent: &T,
    ) -> Outcome {
        self.update(Resource::Talents, id, talent).await
    }

    pub async fn delete_talent(&self, id: &str) -> Outcome<()> {
        self.delete(Resource::Talents, id).await
    }

    // schedules

    pub async fn create_schedules(&self, schedule: &NewSchedule) -> Outcome {
        self.create(Resource::Schedules, schedule).await
    }

    pub async fn get_all_schedules(&self) -> Outcome {
        self.list(Resource::Schedules).await
    }

    pub async fn get_one_schedule(&self, id: &str) -> Outcome {
        self.get_one(Resource::Schedules, id).await
    }

    pub async fn delete_schedules(&self, id: &str) -> Outcome<()> {
        self.delete(Resource::Schedules, id).await
    }

    // documents

    pub async fn upload_documents(&self, document: UploadForm) -> Outcome {
        self.upload(Resource::Documents, document).await
    }

    pub async fn get_all_documents(&self) -> Outcome {
        self.list(Resource::Documents).await
    }

    pub async fn get_one_document(&self, id: &str) -> Outcome {
        self.get_one(Resource::Documents, id).await
    }

    pub async fn update_documents<T: Serialize + ?Sized + Sync>(
        &self,
        id: &str,
        document: &T,
    ) -> Outcome {
        self.update(Resource::Documents, id, document).await
    }

    pub async fn delete_document(&self, id: &str) -> Outcome<()> {
        self.delete(Resource::Documents, id).await
    }

    // registrations

    /// Register a user for an event.
    pub async fn registration(&self, registration: &NewRegistration) -> Outcome {
        self.create(Resource::Registrations, registration).await
    }

    pub async fn get_all_registration(&self) -> Outcome {
        self.list(Resource::Registrations).await
    }

    pub async fn get_one_registration(&self, id: &str) -> Outcome {
        self.get_one(Resource::Registrations, id).await
    }

    pub async fn delete_registration(&self, id: &str) -> Outcome<()> {
        self.delete(Resource::Registrations, id).await
    }

    // events

    pub async fn create_events(&self, event: &NewEvent) -> Outcome {
        self.create(Resource::Events, event).await
    }

    pub async fn get_all_events(&self) -> Outcome {
        self.list(Resource::Events).await
    }

    pub async fn update_events<T: Serialize + ?Sized + Sync>(
        &self,
        id: &str,
        event: &T,
    ) -> Outcome {
        self.update(Resource::Events, id, event).await
    }

    pub async fn delete_event(&self, id: &str) -> Outcome<()> {
        self.delete(Resource::Events, id).await
    }

    // images

    pub async fn upload_images(&self, images: UploadForm) -> Outcome {
        self.upload(Resource::Images, images).await
    }

    pub async fn get_all_images(&self) -> Outcome {
        self.list(Resource::Images).await
    }

    pub async fn get_one_images(&self, id: &str) -> Outcome {
        self.get_one(Resource::Images, id).await
    }

    // payments

    pub async fn create_payments(&self, registration_id: &str) -> Outcome {
        let payment = NewPayment {
            registration_id: registration_id.to_string(),
        };
        self.create(Resource::Payments, &payment).await
    }

    pub async fn get_all_payments(&self) -> Outcome {
        self.list(Resource::Payments).await
    }

    pub async fn get_one_payments(&self, id: &str) -> Outcome {
        self.get_one(Resource::Payments, id).await
    }
}
