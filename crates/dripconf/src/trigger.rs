//! Configuration triggers
//!
//! A trigger is an extension that runs when [`Config::configure`] is
//! called. It gets two chances to act:
//!
//! 1. [`Trigger::clean`] sees the whole configuration tree and returns the
//!    normalized part it is responsible for. That result is merged back,
//!    so defaults filled in here become regular configuration.
//! 2. [`Trigger::configure`] sees the updated tree and performs whatever
//!    process-wide setup the trigger exists for.
//!
//! [`Config::configure`]: crate::Config::configure

use std::borrow::Cow;
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::FieldFailure;
use crate::node::ConfigNode;
use crate::value::ConfigValue;
use crate::{Error, Result};

/// Something that prepares and then applies configuration
pub trait Trigger: Send {
    /// Name used in logs and errors.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Validate and normalize the section this trigger owns.
    ///
    /// Receives the whole tree. Keys outside the trigger's section must be
    /// ignored, not rejected. The returned node is merged back into the
    /// configuration.
    fn clean(&self, config: &ConfigNode) -> Result<ConfigNode>;

    /// Apply the final configuration.
    fn configure(&self, config: &ConfigNode) -> Result<()>;
}

/// A trigger whose `clean` step validates one section against a typed schema
///
/// The section is deserialized into `T`, so serde attributes provide
/// defaults (`#[serde(default)]`) and coercion (see [`crate::coerce`]), and
/// [`Validate`] provides range and length checks. The normalized `T` is
/// written back under the same section name. Unknown keys inside the
/// section are ignored by serde and left untouched by the merge-back.
///
/// `configure` does nothing; wrap or reimplement [`Trigger`] to act on the
/// result.
///
/// # Example
///
/// ```
/// use dripconf::{Config, SchemaTrigger, coerce};
/// use serde::{Deserialize, Serialize};
/// use serde_json::json;
/// use validator::Validate;
///
/// #[derive(Serialize, Deserialize, Validate)]
/// struct Pool {
///     #[serde(default = "default_size", deserialize_with = "coerce::int")]
///     #[validate(range(min = 1, max = 20))]
///     size: u32,
/// }
///
/// fn default_size() -> u32 {
///     5
/// }
///
/// let mut config = Config::new();
/// config.register_trigger(SchemaTrigger::<Pool>::new("pool"));
/// config.merge(json!({"pool": {}})).unwrap();
/// config.configure().unwrap();
///
/// assert_eq!(config["pool"]["size"], 5);
/// ```
pub struct SchemaTrigger<T> {
    section: String,
    required: bool,
    schema: PhantomData<fn() -> T>,
}

impl<T> SchemaTrigger<T>
where
    T: DeserializeOwned + Serialize + Validate,
{
    /// Validate `section` when it is present; an absent section is fine.
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            required: false,
            schema: PhantomData,
        }
    }

    /// Validate `section` and fail when it is absent.
    pub fn required(section: impl Into<String>) -> Self {
        Self {
            required: true,
            ..Self::new(section)
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    /// Validate the section and return it as the typed schema.
    ///
    /// `Ok(None)` means the section is absent and optional.
    pub fn validate(&self, config: &ConfigNode) -> Result<Option<T>> {
        let Some(value) = config.get(&self.section) else {
            if self.required {
                return Err(Error::validation(
                    &self.section,
                    vec![FieldFailure::new(&self.section, "required key not provided")],
                ));
            }
            return Ok(None);
        };

        let typed: T = serde_path_to_error::deserialize(serde_json::Value::from(value))
            .map_err(|e| {
                let field = match e.path().to_string().as_str() {
                    "." => self.section.clone(),
                    path => format!("{}.{path}", self.section),
                };
                let failure = FieldFailure::new(field, e.inner().to_string());
                Error::validation(&self.section, vec![failure])
            })?;

        typed
            .validate()
            .map_err(|errors| Error::validation(&self.section, flatten(&self.section, &errors)))?;

        Ok(Some(typed))
    }
}

impl<T> Trigger for SchemaTrigger<T>
where
    T: DeserializeOwned + Serialize + Validate,
{
    fn name(&self) -> &str {
        &self.section
    }

    fn clean(&self, config: &ConfigNode) -> Result<ConfigNode> {
        let mut cleaned = ConfigNode::new();
        if let Some(typed) = self.validate(config)? {
            // unset optional fields serialize as null; they must not erase
            // anything on the way back in
            let normalized = ConfigValue::from_serialize(&typed)?.without_nulls();
            cleaned.insert(self.section.clone(), normalized);
        }
        Ok(cleaned)
    }

    fn configure(&self, _config: &ConfigNode) -> Result<()> {
        Ok(())
    }
}

/// Flatten nested validator errors into dotted field paths, sorted.
fn flatten(prefix: &str, errors: &ValidationErrors) -> Vec<FieldFailure> {
    let mut failures = Vec::new();
    collect(prefix, errors, &mut failures);
    failures.sort_by(|a, b| a.field.cmp(&b.field));
    failures
}

fn collect(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldFailure>) {
    for (field, kind) in errors.errors() {
        let path = format!("{prefix}.{field}");
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    let message = error
                        .message
                        .clone()
                        .unwrap_or_else(|| Cow::Owned(format!("failed '{}' check", error.code)));
                    out.push(FieldFailure::new(&path, message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(&format!("{path}.{index}"), nested, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, Validate)]
    struct Credentials {
        username: String,
        password: String,
    }

    #[derive(Debug, Serialize, Deserialize, Validate)]
    struct Service {
        host: String,
        #[serde(deserialize_with = "coerce::int")]
        port: u16,
        #[serde(default = "default_pool_size", deserialize_with = "coerce::int")]
        #[validate(range(min = 1, max = 20))]
        pool_size: u32,
        #[validate(nested)]
        credentials: Credentials,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    }

    fn default_pool_size() -> u32 {
        5
    }

    fn tree(value: serde_json::Value) -> ConfigNode {
        ConfigNode::try_from(value).unwrap()
    }

    fn service(extra: serde_json::Value) -> ConfigNode {
        let mut svc = json!({
            "host": "xyz",
            "port": 123,
            "credentials": {"username": "foo", "password": "bar"}
        });
        for (k, v) in extra.as_object().unwrap() {
            svc[k] = v.clone();
        }
        tree(json!({ "some_service": svc, "unrelated": {"keep": true} }))
    }

    #[test]
    fn test_clean_injects_defaults_and_only_returns_its_section() {
        let trigger = SchemaTrigger::<Service>::new("some_service");
        let cleaned = trigger.clean(&service(json!({}))).unwrap();

        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned["some_service"]["pool_size"], 5);
        assert!(!cleaned.contains_key("unrelated"));
    }

    #[test]
    fn test_clean_coerces_numeric_strings() {
        let trigger = SchemaTrigger::<Service>::new("some_service");
        let cleaned = trigger.clean(&service(json!({"port": "123"}))).unwrap();
        assert_eq!(cleaned["some_service"]["port"], 123);
    }

    #[test]
    fn test_clean_rejects_out_of_range() {
        let trigger = SchemaTrigger::<Service>::new("some_service");
        let err = trigger
            .clean(&service(json!({"pool_size": 21})))
            .unwrap_err();

        assert!(matches!(err, Error::Validation { ref section, .. } if section == "some_service"));
        assert_eq!(err.failures().len(), 1);
        assert_eq!(err.failures()[0].field, "some_service.pool_size");
    }

    #[test]
    fn test_coercion_failure_names_the_key() {
        let trigger = SchemaTrigger::<Service>::new("some_service");
        let err = trigger
            .clean(&service(json!({"port": "eighty"})))
            .unwrap_err();

        assert_eq!(err.failures().len(), 1);
        assert_eq!(err.failures()[0].field, "some_service.port");
        assert!(err.failures()[0].message.contains("'eighty'"));
    }

    #[test]
    fn test_nested_type_failure_names_the_full_path() {
        let trigger = SchemaTrigger::<Service>::new("some_service");
        let config = service(json!({"credentials": {"username": "foo", "password": 7}}));

        let err = trigger.clean(&config).unwrap_err();
        assert_eq!(err.failures()[0].field, "some_service.credentials.password");
    }

    #[test]
    fn test_missing_required_field_is_validation_error() {
        let trigger = SchemaTrigger::<Service>::new("some_service");
        let config = tree(json!({"some_service": {"port": 1}}));

        let err = trigger.clean(&config).unwrap_err();
        assert!(err.to_string().contains("missing field"));
    }

    #[test]
    fn test_absent_optional_section_passes_through() {
        let trigger = SchemaTrigger::<Service>::new("some_service");
        let cleaned = trigger.clean(&tree(json!({"other": 1}))).unwrap();
        assert!(cleaned.is_empty());
    }

    #[test]
    fn test_absent_required_section_fails() {
        let trigger = SchemaTrigger::<Service>::required("some_service");
        let err = trigger.clean(&tree(json!({}))).unwrap_err();
        assert_eq!(err.failures()[0].message, "required key not provided");
    }

    #[test]
    fn test_unset_options_do_not_appear() {
        let trigger = SchemaTrigger::<Service>::new("some_service");
        let cleaned = trigger.clean(&service(json!({}))).unwrap();
        assert!(!cleaned["some_service"].as_node().unwrap().contains_key("label"));
    }
}
