//! Modal form for the token-collecting provider.
//!
//! The payer never types card data into the host site. The rendered modal
//! drives the network's client-side token flow (create token, request OTP,
//! verify) and submits only the resulting verified token back to the host.
//! The form carries the merchant id and branding image the modal needs; the
//! secret key stays server-side.

use url::Url;

use crate::config::ProviderConfig;
use crate::form::{FieldErrors, FormData};

/// Name of the single field submitted by the modal.
pub const TOKEN_FIELD: &str = "token";

/// The hosted-modal form, unbound on first render or bound to a submission.
#[derive(Debug)]
pub struct ModalForm {
    /// Merchant identifier the client-side flow authenticates with.
    pub merchant_id: String,
    /// Optional merchant logo shown in the modal.
    pub image: Option<Url>,
    bound: bool,
    errors: FieldErrors,
    token: Option<String>,
}

impl ModalForm {
    /// An empty form for the first render.
    pub fn unbound(config: &ProviderConfig) -> Self {
        ModalForm {
            merchant_id: config.merchant_id.clone(),
            image: config.image.clone(),
            bound: false,
            errors: FieldErrors::new(),
            token: None,
        }
    }

    /// Binds and validates submitted data.
    pub fn bind(config: &ProviderConfig, data: &FormData) -> Self {
        let mut form = Self::unbound(config);
        form.bound = true;
        match data.get_trimmed(TOKEN_FIELD) {
            Some(token) => form.token = Some(token.to_string()),
            None => {
                form.errors
                    .insert(TOKEN_FIELD, "This field is required".to_string());
            }
        }
        form
    }

    /// Whether the form is bound to a submission carrying a token.
    pub fn is_valid(&self) -> bool {
        self.bound && self.errors.is_empty() && self.token.is_some()
    }

    /// Validation errors keyed by field name, for re-rendering.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub(crate) fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::testing::test_config;

    #[test]
    fn unbound_form_carries_merchant_branding() {
        let form = ModalForm::unbound(&test_config());
        assert_eq!(form.merchant_id, "merchant-42");
        assert!(!form.is_valid());
    }

    #[test]
    fn binds_a_submitted_token() {
        let data: FormData = [("token", "tok_verified")].into_iter().collect();
        let form = ModalForm::bind(&test_config(), &data);
        assert!(form.is_valid());
        assert_eq!(form.token(), Some("tok_verified"));
    }

    #[test]
    fn missing_token_collects_an_error() {
        let form = ModalForm::bind(&test_config(), &FormData::new());
        assert!(!form.is_valid());
        assert!(form.errors().contains_key(TOKEN_FIELD));
    }
}
