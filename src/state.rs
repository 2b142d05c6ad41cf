use crate::api::ApiClient;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

impl AppState {
    pub fn new(api: ApiClient) -> Self {
        Self {
            store: Store::new(api),
        }
    }
}
