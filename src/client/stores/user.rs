//! User profile store.

use tokio::sync::watch;

use crate::client::services::UserService;
use crate::client::stores::{Reducer, StateCell};
use crate::shared::models::{Address, AddressInput, ChangePasswordRequest, ProfileUpdate, UserProfile};

const LOAD_PROFILE_FAILED: &str = "Failed to load profile";
const UPDATE_PROFILE_FAILED: &str = "Failed to update profile";
const CHANGE_PASSWORD_FAILED: &str = "Failed to change password";
const LOAD_ADDRESSES_FAILED: &str = "Failed to load addresses";
const ADD_ADDRESS_FAILED: &str = "Failed to add address";
const UPDATE_ADDRESS_FAILED: &str = "Failed to update address";
const DELETE_ADDRESS_FAILED: &str = "Failed to delete address";

/// User profile state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    pub profile: Option<UserProfile>,
    pub addresses: Vec<Address>,
    pub loading: bool,
    pub error: Option<String>,
}

/// User profile transitions
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    Started,
    /// Full profile, addresses included
    ProfileLoaded(UserProfile),
    ProfileUpdated(UserProfile),
    PasswordChanged,
    AddressesLoaded(Vec<Address>),
    AddressAdded(Address),
    AddressUpdated(Address),
    AddressDeleted(i64),
    Failed(String),
    ClearError,
}

impl Reducer for UserState {
    type Action = UserAction;

    fn reduce(self, action: UserAction) -> Self {
        match action {
            UserAction::Started => Self {
                loading: true,
                error: None,
                ..self
            },
            UserAction::ProfileLoaded(profile) => Self {
                addresses: profile.addresses.clone(),
                profile: Some(profile),
                loading: false,
                ..self
            },
            UserAction::ProfileUpdated(profile) => Self {
                profile: Some(profile),
                loading: false,
                ..self
            },
            UserAction::PasswordChanged => Self {
                loading: false,
                ..self
            },
            UserAction::AddressesLoaded(addresses) => Self {
                addresses,
                loading: false,
                ..self
            },
            UserAction::AddressAdded(address) => {
                let mut addresses = self.addresses;
                addresses.push(address);
                Self {
                    addresses,
                    loading: false,
                    ..self
                }
            }
            UserAction::AddressUpdated(address) => {
                let addresses = self
                    .addresses
                    .into_iter()
                    .map(|a| if a.id == address.id { address.clone() } else { a })
                    .collect();
                Self {
                    addresses,
                    loading: false,
                    ..self
                }
            }
            UserAction::AddressDeleted(id) => {
                let addresses = self.addresses.into_iter().filter(|a| a.id != id).collect();
                Self {
                    addresses,
                    loading: false,
                    ..self
                }
            }
            UserAction::Failed(message) => Self {
                loading: false,
                error: Some(message),
                ..self
            },
            UserAction::ClearError => Self {
                error: None,
                ..self
            },
        }
    }
}

/// User profile store
#[derive(Debug)]
pub struct UserStore {
    service: UserService,
    state: StateCell<UserState>,
}

impl UserStore {
    pub fn new(service: UserService) -> Self {
        Self {
            service,
            state: StateCell::new(),
        }
    }

    pub fn snapshot(&self) -> UserState {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<UserState> {
        self.state.subscribe()
    }

    /// Load the profile and its addresses
    pub async fn fetch_profile(&self) {
        self.state.apply(UserAction::Started);
        match self.service.profile().await {
            Ok(profile) => self.state.apply(UserAction::ProfileLoaded(profile)),
            Err(e) => self.fail("Loading profile", e.user_message(LOAD_PROFILE_FAILED)),
        }
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) {
        self.state.apply(UserAction::Started);
        match self.service.update_profile(update).await {
            Ok(profile) => self.state.apply(UserAction::ProfileUpdated(profile)),
            Err(e) => self.fail("Updating profile", e.user_message(UPDATE_PROFILE_FAILED)),
        }
    }

    /// Change the password; returns whether the server accepted it
    ///
    /// A rejected old password is reported with the server's message as is.
    pub async fn change_password(&self, request: &ChangePasswordRequest) -> bool {
        self.state.apply(UserAction::Started);
        match self.service.change_password(request).await {
            Ok(()) => {
                self.state.apply(UserAction::PasswordChanged);
                true
            }
            Err(e) => {
                self.fail(
                    "Changing password",
                    e.field_message("old_password", CHANGE_PASSWORD_FAILED),
                );
                false
            }
        }
    }

    pub async fn fetch_addresses(&self) {
        self.state.apply(UserAction::Started);
        match self.service.addresses().await {
            Ok(addresses) => self.state.apply(UserAction::AddressesLoaded(addresses)),
            Err(e) => self.fail("Loading addresses", e.user_message(LOAD_ADDRESSES_FAILED)),
        }
    }

    pub async fn add_address(&self, address: &AddressInput) {
        self.state.apply(UserAction::Started);
        match self.service.add_address(address).await {
            Ok(created) => self.state.apply(UserAction::AddressAdded(created)),
            Err(e) => self.fail("Adding address", e.user_message(ADD_ADDRESS_FAILED)),
        }
    }

    pub async fn update_address(&self, id: i64, address: &AddressInput) {
        self.state.apply(UserAction::Started);
        match self.service.update_address(id, address).await {
            Ok(updated) => self.state.apply(UserAction::AddressUpdated(updated)),
            Err(e) => self.fail("Updating address", e.user_message(UPDATE_ADDRESS_FAILED)),
        }
    }

    pub async fn delete_address(&self, id: i64) {
        self.state.apply(UserAction::Started);
        match self.service.delete_address(id).await {
            Ok(()) => self.state.apply(UserAction::AddressDeleted(id)),
            Err(e) => self.fail("Deleting address", e.user_message(DELETE_ADDRESS_FAILED)),
        }
    }

    pub fn clear_errors(&self) {
        self.state.apply(UserAction::ClearError);
    }

    fn fail(&self, operation: &str, message: String) {
        tracing::warn!("[UserStore] {} failed: {}", operation, message);
        self.state.apply(UserAction::Failed(message));
    }
}
