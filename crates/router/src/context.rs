//! Client and tenant context binding
//!
//! The binder inspects the record's arguments for a client address,
//! falling back to the explicit caller context when the arguments carry
//! none, and attaches tenant identity when the deployment is
//! multi-tenant. Binding may also trim the message: records shaped like
//! `"ident - message"` drop the identity half once the client has been
//! extracted from the arguments.

use crate::record::{ArgValue, LogArgs, LogRecord};
use crate::tenant::TenantProvider;

/// Context attached to a record at bind time
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoundContext {
    /// Client address or session identifier
    pub client: Option<String>,
    /// Tenant schema, present only in multi-tenant mode
    pub schema_name: Option<String>,
    /// Tenant serving domain
    pub domain_url: Option<String>,
}

/// Result of binding: the context plus the possibly-trimmed message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound {
    /// Extracted client and tenant identity
    pub context: BoundContext,
    /// Output message; differs from the record's when the identity
    /// prefix was trimmed
    pub message: String,
}

/// Bind client and tenant context for one record
pub fn bind(record: &LogRecord, tenants: &dyn TenantProvider) -> Bound {
    let mut message = record.message.clone();
    let mut client = None;

    match &record.args {
        LogArgs::KeyedFields(fields) => {
            client = fields
                .get("client_addr")
                .or_else(|| fields.get("client"))
                .cloned();
        }
        // Only the first positional argument is considered; later ones
        // never carry the client.
        LogArgs::Positional(values) => match values.first() {
            Some(ArgValue::Text(text)) if text.contains(':') => {
                client = Some(text.clone());
                message = trim_ident(&message);
            }
            Some(ArgValue::Pair(host, port)) => {
                client = Some(format!("{}:{}", host, port));
                message = trim_ident(&message);
            }
            _ => {}
        },
        LogArgs::Empty => {}
    }

    if client.is_none() {
        client = record
            .caller_context
            .as_ref()
            .and_then(|ctx| ctx.client.clone());
    }

    let mut context = BoundContext {
        client,
        schema_name: None,
        domain_url: None,
    };

    if tenants.is_multi_tenant() {
        if let Some(tenant) = tenants.current_tenant() {
            context.schema_name = Some(tenant.schema_name);
            context.domain_url = tenant.domain_url;
        }
    }

    Bound { context, message }
}

/// Drop the identity half of an `"ident - message"` pair.
///
/// Only messages that split into exactly two dash-separated parts are
/// trimmed; anything else passes through unchanged.
fn trim_ident(message: &str) -> String {
    let parts: Vec<&str> = message.split('-').collect();
    if parts.len() == 2 {
        parts[1].trim_matches(' ').to_string()
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use fanlog_config::Level;

    use super::*;
    use crate::record::CallerContext;
    use crate::tenant::{SingleTenant, Tenant};

    struct CountingTenants {
        multi: bool,
        asked: AtomicUsize,
    }

    impl CountingTenants {
        fn new(multi: bool) -> Self {
            Self {
                multi,
                asked: AtomicUsize::new(0),
            }
        }
    }

    impl TenantProvider for CountingTenants {
        fn is_multi_tenant(&self) -> bool {
            self.multi
        }

        fn current_tenant(&self) -> Option<Tenant> {
            self.asked.fetch_add(1, Ordering::SeqCst);
            Some(Tenant::new("acme").with_domain("acme.example.com"))
        }
    }

    fn record(message: &str) -> LogRecord {
        LogRecord::new(Level::Info, message, "logs/app.log")
    }

    #[test]
    fn test_keyed_client_addr_wins_over_client() {
        let rec = record("login ok").with_args(LogArgs::keyed([
            ("client", "10.0.0.2"),
            ("client_addr", "10.0.0.1:4000"),
        ]));
        let bound = bind(&rec, &SingleTenant);
        assert_eq!(bound.context.client.as_deref(), Some("10.0.0.1:4000"));
        assert_eq!(bound.message, "login ok");
    }

    #[test]
    fn test_keyed_falls_back_to_client() {
        let rec = record("login ok").with_args(LogArgs::keyed([("client", "10.0.0.2")]));
        let bound = bind(&rec, &SingleTenant);
        assert_eq!(bound.context.client.as_deref(), Some("10.0.0.2"));
    }

    #[test]
    fn test_positional_text_with_colon_extracts_and_trims() {
        let rec = record("session-42 - user disconnected").with_args(LogArgs::Positional(vec![
            ArgValue::Text("10.0.0.3:5123".into()),
        ]));
        let bound = bind(&rec, &SingleTenant);
        assert_eq!(bound.context.client.as_deref(), Some("10.0.0.3:5123"));
        assert_eq!(bound.message, "user disconnected");
    }

    #[test]
    fn test_positional_pair_joined_with_colon() {
        let rec = record("a - b").with_args(LogArgs::Positional(vec![ArgValue::Pair(
            "10.0.0.4".into(),
            "6000".into(),
        )]));
        let bound = bind(&rec, &SingleTenant);
        assert_eq!(bound.context.client.as_deref(), Some("10.0.0.4:6000"));
        assert_eq!(bound.message, "b");
    }

    #[test]
    fn test_positional_text_without_colon_is_not_a_client() {
        let rec = record("hello")
            .with_args(LogArgs::Positional(vec![ArgValue::Text("plain".into())]));
        let bound = bind(&rec, &SingleTenant);
        assert_eq!(bound.context.client, None);
        assert_eq!(bound.message, "hello");
    }

    #[test]
    fn test_later_positional_elements_are_ignored() {
        let rec = record("hello").with_args(LogArgs::Positional(vec![
            ArgValue::Text("plain".into()),
            ArgValue::Text("10.0.0.1:9".into()),
        ]));
        let bound = bind(&rec, &SingleTenant);
        assert_eq!(bound.context.client, None);
    }

    #[test]
    fn test_trim_requires_exactly_two_parts() {
        let rec = record("a - b - c").with_args(LogArgs::Positional(vec![ArgValue::Text(
            "10.0.0.5:1".into(),
        )]));
        let bound = bind(&rec, &SingleTenant);
        // Three dash-separated parts: message kept verbatim.
        assert_eq!(bound.message, "a - b - c");
    }

    #[test]
    fn test_caller_context_fallback() {
        let rec = record("hello").with_caller_context(CallerContext::with_client("10.0.0.9:88"));
        let bound = bind(&rec, &SingleTenant);
        assert_eq!(bound.context.client.as_deref(), Some("10.0.0.9:88"));
    }

    #[test]
    fn test_args_take_precedence_over_caller_context() {
        let rec = record("hello")
            .with_args(LogArgs::keyed([("client_addr", "from-args:1")]))
            .with_caller_context(CallerContext::with_client("from-context:2"));
        let bound = bind(&rec, &SingleTenant);
        assert_eq!(bound.context.client.as_deref(), Some("from-args:1"));
    }

    #[test]
    fn test_multi_tenant_binds_schema_and_domain() {
        let tenants = CountingTenants::new(true);
        let bound = bind(&record("hello"), &tenants);
        assert_eq!(bound.context.schema_name.as_deref(), Some("acme"));
        assert_eq!(bound.context.domain_url.as_deref(), Some("acme.example.com"));
        assert_eq!(tenants.asked.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_single_tenant_never_queried() {
        let tenants = CountingTenants::new(false);
        let bound = bind(&record("hello"), &tenants);
        assert_eq!(bound.context.schema_name, None);
        assert_eq!(bound.context.domain_url, None);
        assert_eq!(tenants.asked.load(Ordering::SeqCst), 0);
    }
}
