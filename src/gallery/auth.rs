//! Credential checks for the admin portal and the client gallery

use std::rc::Rc;

use crate::config::StudioConfig;
use crate::state::AccessCode;

/// Decides whether a credential is accepted.
///
/// The gallery roles only ever ask yes/no questions here, so a hashed or
/// remote check can replace the literal comparison without touching them.
pub trait CredentialCheck {
    fn check_admin_password(&self, password: &str) -> bool;

    fn check_client_code(&self, code: &AccessCode) -> bool;
}

/// Literal password and a fixed allow-list of client codes
#[derive(Debug, Clone)]
pub struct FixedCredentials {
    admin_password: String,
    client_codes: Vec<AccessCode>,
}

impl FixedCredentials {
    pub fn new(admin_password: impl Into<String>, client_codes: &[String]) -> Self {
        Self {
            admin_password: admin_password.into(),
            client_codes: client_codes
                .iter()
                .filter_map(|code| AccessCode::parse(code))
                .collect(),
        }
    }

    pub fn from_config(config: &StudioConfig) -> Self {
        Self::new(config.admin_password.clone(), &config.client_codes)
    }
}

impl CredentialCheck for FixedCredentials {
    fn check_admin_password(&self, password: &str) -> bool {
        password.as_bytes() == self.admin_password.as_bytes()
    }

    fn check_client_code(&self, code: &AccessCode) -> bool {
        self.client_codes.contains(code)
    }
}

impl<T: CredentialCheck + ?Sized> CredentialCheck for Rc<T> {
    fn check_admin_password(&self, password: &str) -> bool {
        (**self).check_admin_password(password)
    }

    fn check_client_code(&self, code: &AccessCode) -> bool {
        (**self).check_client_code(code)
    }
}
