use serde::{Deserialize, Serialize};

/// A trip resource. Trips are an external collaborator of the session core:
/// their routes consume the authenticated identity but contain no
/// authentication logic of their own.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Trip {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
}

impl Trip {
    pub fn new(
        user_id: String,
        title: String,
        location: String,
        start_date: String,
        end_date: String,
    ) -> Self {
        Trip {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            title,
            location,
            start_date,
            end_date,
        }
    }
}
