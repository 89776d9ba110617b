use crate::dns::Resolve;
use crate::names::Fqdn;
use hickory_resolver::proto::rr::RecordType;
use std::fmt;
use std::sync::Arc;

/// Parameters of the query about to be issued.
///
/// One context lives for one public call and is rewritten as the browse
/// moves from zones to names to instances.
pub(crate) struct LookupContext {
    pub resolver: Arc<dyn Resolve>,
    pub domain: Fqdn,
    pub prefix: String,
    pub label: String,
    pub service_type: String,
    pub rtype: RecordType,
    pub secure: bool,
}

impl LookupContext {
    pub fn new(resolver: Arc<dyn Resolve>, domain: Fqdn, rtype: RecordType, secure: bool) -> Self {
        Self {
            resolver,
            domain,
            prefix: String::new(),
            label: String::new(),
            service_type: String::new(),
            rtype,
            secure,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = service_type.into();
        self
    }

    /// Repoints the context at `domain` with an empty prefix.
    pub fn retarget(&mut self, domain: Fqdn, rtype: RecordType) {
        self.domain = domain;
        self.prefix.clear();
        self.rtype = rtype;
    }

    /// The name the next query asks for.
    pub fn query_name(&self) -> String {
        self.domain.with_prefix(&self.prefix)
    }

    pub fn server(&self) -> String {
        self.resolver.server()
    }
}

impl fmt::Debug for LookupContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupContext")
            .field("server", &self.resolver.server())
            .field("query", &self.query_name())
            .field("label", &self.label)
            .field("rtype", &self.rtype)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}
