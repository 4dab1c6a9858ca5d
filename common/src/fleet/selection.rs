/// Which registered targets take part in one invocation.
///
/// The three criteria are not exclusive: every one that is set contributes its matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// `-t ip`
    pub single: Option<String>,
    /// `-T "ip1 ip2 ..."`, space separated.
    pub many: Option<String>,
    /// `-a`
    pub all: bool,
}

impl Selection {
    pub fn single(ip: impl Into<String>) -> Self {
        Self {
            single: Some(ip.into()),
            ..Self::default()
        }
    }

    pub fn many(ips: impl Into<String>) -> Self {
        Self {
            many: Some(ips.into()),
            ..Self::default()
        }
    }

    pub fn all() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    /// The IPs requested through `many`, in the order they were given.
    pub fn requested_ips(&self) -> Vec<&str> {
        self.many
            .as_deref()
            .map(|ips| ips.split(' ').filter(|ip| !ip.is_empty()).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        !self.all
            && self.single.as_deref().is_none_or(str::is_empty)
            && self.requested_ips().is_empty()
    }
}
