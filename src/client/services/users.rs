//! User Profile API Client

use std::sync::Arc;

use crate::client::error::ApiError;
use crate::client::http::{ApiClient, ApiRequest};
use crate::shared::models::{Address, AddressInput, ChangePasswordRequest, ProfileUpdate, UserProfile};

/// User profile API client
#[derive(Debug, Clone)]
pub struct UserService {
    client: Arc<ApiClient>,
}

impl UserService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.client.send_json(ApiRequest::get("/users/profile/")).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        let request = ApiRequest::put("/users/profile/").json(update)?;
        self.client.send_json(request).await
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<(), ApiError> {
        let request = ApiRequest::post("/users/change-password/").json(request)?;
        self.client.send(request).await?;
        Ok(())
    }

    pub async fn addresses(&self) -> Result<Vec<Address>, ApiError> {
        self.client.send_json(ApiRequest::get("/users/addresses/")).await
    }

    pub async fn add_address(&self, address: &AddressInput) -> Result<Address, ApiError> {
        let request = ApiRequest::post("/users/addresses/").json(address)?;
        self.client.send_json(request).await
    }

    pub async fn update_address(&self, id: i64, address: &AddressInput) -> Result<Address, ApiError> {
        let request = ApiRequest::put(format!("/users/addresses/{}/", id)).json(address)?;
        self.client.send_json(request).await
    }

    pub async fn delete_address(&self, id: i64) -> Result<(), ApiError> {
        self.client
            .send(ApiRequest::delete(format!("/users/addresses/{}/", id)))
            .await?;
        Ok(())
    }
}
