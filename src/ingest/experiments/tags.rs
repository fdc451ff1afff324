//! Experiment parameters encoded in run tags such as
//! `long-policing-0.3-1.0-link-100Mbps-nflows-2-tcp-cubic-rtt-50-50`.

use regex::Regex;

use crate::error::IngestError;

/// Attribute experiments are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Policing,
    Shaping,
    TransferSize,
    LinkSpeed,
    NumFlows,
    Tcp,
    Rtt,
    Congestion,
}

impl GroupKey {
    /// Name used in output file names.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            GroupKey::Policing => "policing",
            GroupKey::Shaping => "shaping",
            GroupKey::TransferSize => "transferSize",
            GroupKey::LinkSpeed => "linkSpeed",
            GroupKey::NumFlows => "numFlows",
            GroupKey::Tcp => "tcp",
            GroupKey::Rtt => "rtt",
            GroupKey::Congestion => "congestion",
        }
    }
}

/// Parameters found in a tag. Missing parameters are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagAttributes {
    pub policing: String,
    pub shaping: String,
    pub transfer_size: String,
    pub link_speed: String,
    pub num_flows: String,
    pub tcp: String,
    pub rtt: String,
    pub congestion: String,
}

impl TagAttributes {
    #[must_use]
    pub fn get(&self, key: GroupKey) -> &str {
        match key {
            GroupKey::Policing => &self.policing,
            GroupKey::Shaping => &self.shaping,
            GroupKey::TransferSize => &self.transfer_size,
            GroupKey::LinkSpeed => &self.link_speed,
            GroupKey::NumFlows => &self.num_flows,
            GroupKey::Tcp => &self.tcp,
            GroupKey::Rtt => &self.rtt,
            GroupKey::Congestion => &self.congestion,
        }
    }

    /// Bottleneck speed in Mbps.
    #[must_use]
    pub fn link_speed_mbps(&self) -> Option<f64> {
        self.link_speed
            .strip_suffix("Mbps")
            .and_then(|value| value.parse::<f64>().ok())
            .filter(|value| *value > 0.0)
    }

    /// Time to queue one 1500-byte frame at the bottleneck, in microseconds.
    #[must_use]
    pub fn queuing_delay_us(&self) -> Option<f64> {
        self.link_speed_mbps().map(|speed| 1500.0 * 8.0 / speed)
    }
}

/// Compiled tag patterns.
#[derive(Debug, Clone)]
pub struct TagPatterns {
    policing: Regex,
    shaping: Regex,
    transfer_size: Regex,
    link_speed: Regex,
    num_flows: Regex,
    tcp: Regex,
    rtt: Regex,
    congestion: Regex,
}

impl TagPatterns {
    /// # Errors
    ///
    /// Returns an error if a pattern fails to compile.
    pub fn new() -> Result<Self, IngestError> {
        Ok(Self {
            policing: Regex::new(r"policing-[0-9]+(\.[0-9]+)?-[0-9]+(\.[0-9]+)?")?,
            shaping: Regex::new(r"shaping-[0-9]+(\.[0-9]+)?-[0-9]+(\.[0-9]+)?")?,
            transfer_size: Regex::new(r"transfer-size-[0-9]+(\.[0-9]+)?-[0-9]+(\.[0-9]+)?")?,
            link_speed: Regex::new(r"link-[0-9]+(\.[0-9]+)?Mbps")?,
            num_flows: Regex::new(r"nflows-[0-9]+")?,
            tcp: Regex::new(r"tcp-(cubic-reno|reno-cubic|cubic|reno)")?,
            rtt: Regex::new(r"rtt-[0-9]+-[0-9]+")?,
            congestion: Regex::new(r"congestion-[a-zA-Z0-9]+-[a-zA-Z0-9]+")?,
        })
    }

    /// Extracts every known parameter of `tag`. Tags with neither policing
    /// nor shaping are `neutral` for both.
    #[must_use]
    pub fn attributes(&self, tag: &str) -> TagAttributes {
        let found = |pattern: &Regex, prefix: &str| -> Option<String> {
            pattern
                .find(tag)
                .map(|hit| hit.as_str().trim_start_matches(prefix).to_owned())
        };
        let pair = |pattern: &Regex, prefix: &str| -> String {
            found(pattern, prefix)
                .map(|value| value.replace('-', "/"))
                .unwrap_or_default()
        };

        let mut attributes = TagAttributes {
            policing: pair(&self.policing, "policing-").replace("1.0/1.0", "No policing"),
            shaping: pair(&self.shaping, "shaping-"),
            transfer_size: collapse_equal(
                &pair(&self.transfer_size, "transfer-size-").replace("9999", "Long"),
            ),
            link_speed: found(&self.link_speed, "link-").unwrap_or_default(),
            num_flows: found(&self.num_flows, "nflows-")
                .and_then(|count| count.parse::<u64>().ok())
                .and_then(|count| count.checked_mul(4))
                .map(|count| count.to_string())
                .unwrap_or_default(),
            tcp: pair(&self.tcp, "tcp-"),
            rtt: collapse_equal(&pair(&self.rtt, "rtt-")),
            congestion: pair(&self.congestion, "congestion-")
                .replace("light", "lo")
                .replace("medium", "me")
                .replace("high", "hi")
                .replace("none", "no"),
        };
        if attributes.policing.is_empty() && attributes.shaping.is_empty() {
            attributes.policing = "neutral".to_owned();
            attributes.shaping = "neutral".to_owned();
        }
        attributes
    }
}

/// `a/a` becomes `a`.
fn collapse_equal(value: &str) -> String {
    match value.split_once('/') {
        Some((first, second)) if first == second => first.to_owned(),
        Some(_) | None => value.to_owned(),
    }
}
