//! Profile Set Resolver - reads a capability statement and accumulates the
//! profiles it declares.

use tracing::{debug, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{DocumentSource, SpecParser},
    },
    domain::{CancelToken, CapabilityLocation, DomainError, ProfileSet},
    error::EhrGenResult,
};

/// Result of resolving one capability statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Prior profiles followed by newly discovered ones, first-seen order.
    pub profiles: ProfileSet,
    /// Publisher name, only when the caller had no endpoint name.
    pub inferred_name: Option<String>,
}

/// Resolves the effective profile set from a capability statement.
pub struct ProfileSetResolver {
    source: Box<dyn DocumentSource>,
    parser: Box<dyn SpecParser>,
}

impl ProfileSetResolver {
    pub fn new(source: Box<dyn DocumentSource>, parser: Box<dyn SpecParser>) -> Self {
        Self { source, parser }
    }

    /// Load the capability statement at `location` and merge its supported
    /// profiles into `prior`.
    ///
    /// Only the first `rest` section is read. When `endpoint_name` is `None`
    /// the publisher is used as the endpoint name; a missing or blank
    /// publisher is [`DomainError::MissingName`].
    #[instrument(skip_all, fields(location = %location))]
    pub fn resolve(
        &self,
        location: &CapabilityLocation,
        prior: &ProfileSet,
        endpoint_name: Option<&str>,
        token: &CancelToken,
    ) -> EhrGenResult<Resolution> {
        if token.is_cancelled() {
            return Err(ApplicationError::Cancelled {
                reason: "cancelled before reading the capability statement".into(),
            }
            .into());
        }

        let text = self.source.load(location, token)?;
        let declaration = self.parser.parse(&text, &location.to_string())?;

        let mut profiles = prior.clone();
        let added = profiles.merge(declaration.supported_profiles());
        debug!(added, total = profiles.len(), "Merged supported profiles");

        let inferred_name = match endpoint_name {
            Some(_) => None,
            None => {
                let name = declaration
                    .publisher_name()
                    .ok_or(DomainError::MissingName)?;
                debug!(name, "Inferred endpoint name from publisher");
                Some(name.to_string())
            }
        };

        Ok(Resolution {
            profiles,
            inferred_name,
        })
    }
}
