use base64::{engine::general_purpose::STANDARD, Engine};
use iterdig_domain::{DnskeyRecord, DomainName};
use tracing::error;

#[derive(Debug, Clone)]
pub struct TrustAnchor {
    pub zone: DomainName,

    pub dnskey: DnskeyRecord,

    pub description: String,
}

impl TrustAnchor {
    pub fn new(zone: DomainName, dnskey: DnskeyRecord, description: String) -> Self {
        Self {
            zone,
            dnskey,
            description,
        }
    }

    pub fn matches(&self, dnskey: &DnskeyRecord) -> bool {
        if self.dnskey.calculate_key_tag() != dnskey.calculate_key_tag() {
            return false;
        }

        if self.dnskey.algorithm != dnskey.algorithm {
            return false;
        }

        self.dnskey.public_key == dnskey.public_key
    }
}

#[derive(Debug, Clone)]
pub struct TrustAnchorStore {
    anchors: Vec<TrustAnchor>,
}

impl TrustAnchorStore {
    pub fn new() -> Self {
        Self {
            anchors: Self::default_root_anchors(),
        }
    }

    pub fn empty() -> Self {
        Self {
            anchors: Vec::new(),
        }
    }

    pub fn default_root_anchors() -> Vec<TrustAnchor> {
        Self::root_ksk_20326()
            .map(|key| {
                TrustAnchor::new(
                    DomainName::root(),
                    key,
                    "Root KSK-2017 (20326)".to_string(),
                )
            })
            .into_iter()
            .collect()
    }

    fn root_ksk_20326() -> Option<DnskeyRecord> {
        let public_key_b64 = concat!(
            "AwEAAaz/tAm8yTn4Mfeh5eyI96WSVexTBAvkMgJzkKTOiW1vkIbzxeF3",
            "+/4RgWOq7HrxRixHlFlExOLAJr5emLvN7SWXgnLh4+B5xQlNVz8Og8kv",
            "ArMtNROxVQuCaSnIDdD5LKyWbRd2n9WGe2R8PzgCmr3EgVLrjyBxWezF",
            "0jLHwVN8efS3rCj/EWgvIWgb9tarpVUDK/b58Da+sqqls3eNbuv7pr+e",
            "oZG+SrDK6nWeL3c6H5Apxz7LjVc1uTIdsIXxuOLYA4/ilBmSVIzuDWfd",
            "RUfhHdY6+cn8HFRm+2hM8AnXGXws9555KrUB5qihylGa8subX2Nn6UwN",
            "R1AkUTV74bU="
        );

        match STANDARD.decode(public_key_b64) {
            Ok(public_key) => Some(DnskeyRecord::new(257, 8, public_key)),
            Err(e) => {
                error!(error = %e, "Failed to decode built-in root KSK");
                None
            }
        }
    }

    pub fn add_anchor(&mut self, anchor: TrustAnchor) {
        self.anchors.push(anchor);
    }

    pub fn is_trusted(&self, dnskey: &DnskeyRecord, zone: &DomainName) -> bool {
        self.anchors_for(zone).any(|anchor| anchor.matches(dnskey))
    }

    /// Anchors configured for `zone`, in insertion order.
    pub fn anchors_for<'a>(
        &'a self,
        zone: &'a DomainName,
    ) -> impl Iterator<Item = &'a TrustAnchor> + 'a {
        self.anchors.iter().filter(move |anchor| &anchor.zone == zone)
    }
}

impl Default for TrustAnchorStore {
    fn default() -> Self {
        Self::new()
    }
}
