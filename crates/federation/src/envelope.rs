//! Magic Envelope: the Salmon signing wrapper around Atom payloads.
//!
//! An envelope carries the armored payload together with its content
//! type, armor encoding, signature algorithm, and signature. The signing
//! plaintext covers all four data fields, each armored and joined with
//! `.` separators. A field omitted from the XML contributes an *empty*
//! armored segment even though its in-memory value falls back to the
//! protocol default, so a peer that omits `<me:encoding>` and a peer
//! that spells it out sign different plaintexts for the same payload.

use roxmltree::Node;

use ostatus_common::{armor, crypto, ProtocolError, ProtocolResult};
use ostatus_model::Activity;

use crate::atom::entry;
use crate::xml::XmlWriter;

/// Namespace of the Magic Envelope elements (`me:` prefix).
pub const MAGIC_ENV_NS: &str = "http://salmon-protocol.org/ns/magic-env";

/// Payload content type assumed when `<me:data>` has no `type`.
pub const DEFAULT_DATA_TYPE: &str = "application/atom+xml";

/// The only armor encoding the protocol defines.
pub const ENCODING_BASE64URL: &str = "base64url";

/// The only signature algorithm the protocol defines.
pub const ALGORITHM_RSA_SHA256: &str = "RSA-SHA256";

/// A signed Salmon envelope, either locally built or parsed off the
/// wire. Parsing never verifies; call [`MagicEnvelope::verified`] with
/// the sender's public key once it has been fetched.
#[derive(Debug, Clone)]
pub struct MagicEnvelope {
    activity: Activity,
    data: Vec<u8>,
    data_type: String,
    encoding: String,
    algorithm: String,
    signature: Vec<u8>,
    armored_data: String,
    plaintext: String,
}

impl MagicEnvelope {
    /// Sign an activity into an envelope with a magic-key private key.
    ///
    /// # Errors
    ///
    /// Fails when the key string does not parse, the key is too small
    /// for an RSA-SHA256 signature, or the activity cannot be
    /// serialized.
    pub fn build(activity: &Activity, private_key: &str) -> ProtocolResult<Self> {
        let key = crypto::MagicKey::decode(private_key)?;

        let data = entry::serialize_activity(activity)?.into_bytes();
        let armored_data = armor::encode(&data);

        let plaintext = signing_plaintext(
            &armored_data,
            Some(DEFAULT_DATA_TYPE),
            Some(ENCODING_BASE64URL),
            Some(ALGORITHM_RSA_SHA256),
        );
        let signature = crypto::emsa_sign(plaintext.as_bytes(), &key)?;

        Ok(Self {
            activity: activity.clone(),
            data,
            data_type: DEFAULT_DATA_TYPE.to_string(),
            encoding: ENCODING_BASE64URL.to_string(),
            algorithm: ALGORITHM_RSA_SHA256.to_string(),
            signature,
            armored_data,
            plaintext,
        })
    }

    /// Parse a `<me:env>` document.
    ///
    /// # Errors
    ///
    /// Fails when the envelope, its data, or its signature is missing or
    /// unreadable, when the encoding is not base64url, when the
    /// algorithm is not RSA-SHA256, or when the payload is not an Atom
    /// document.
    pub fn parse(xml: &str) -> ProtocolResult<Self> {
        let doc = roxmltree::Document::parse(xml)
            .map_err(|e| ProtocolError::MalformedXml(e.to_string()))?;

        let root = doc.root_element();
        let env = if root.has_tag_name((MAGIC_ENV_NS, "env")) {
            root
        } else {
            doc.descendants()
                .find(|n| n.has_tag_name((MAGIC_ENV_NS, "env")))
                .ok_or(ProtocolError::MissingElement("me:env"))?
        };

        let data_node = child(env, "data").ok_or(ProtocolError::MissingElement("me:data"))?;
        let armored_data: String = data_node
            .text()
            .unwrap_or_default()
            .split_ascii_whitespace()
            .collect();
        let data_type_attr = data_node.attribute("type");

        let sig_node = child(env, "sig").ok_or(ProtocolError::MissingElement("me:sig"))?;
        let signature = armor::decode(sig_node.text().unwrap_or_default())?;

        let encoding = child(env, "encoding").map(text_of);
        if let Some(encoding) = &encoding {
            if !encoding.eq_ignore_ascii_case(ENCODING_BASE64URL) {
                return Err(ProtocolError::UnsupportedEncoding(encoding.clone()));
            }
        }

        let algorithm = child(env, "alg").map(text_of);
        if let Some(algorithm) = &algorithm {
            if !algorithm.eq_ignore_ascii_case(ALGORITHM_RSA_SHA256) {
                return Err(ProtocolError::UnsupportedAlgorithm(algorithm.clone()));
            }
        }

        // Only fields literally present in the XML enter the plaintext;
        // defaulted fields contribute empty segments.
        let plaintext = signing_plaintext(
            &armored_data,
            data_type_attr,
            encoding.as_deref(),
            algorithm.as_deref(),
        );

        let data = armor::decode(&armored_data)?;
        let data_type = data_type_attr.unwrap_or(DEFAULT_DATA_TYPE).to_string();
        let activity = parse_payload(&data, &data_type)?;

        tracing::debug!(
            data_type,
            payload_bytes = data.len(),
            "parsed magic envelope"
        );

        Ok(Self {
            activity,
            data,
            data_type,
            encoding: encoding.unwrap_or_else(|| ENCODING_BASE64URL.to_string()),
            algorithm: algorithm.unwrap_or_else(|| ALGORITHM_RSA_SHA256.to_string()),
            signature,
            armored_data,
            plaintext,
        })
    }

    /// Parse a received body by its content type.
    ///
    /// # Errors
    ///
    /// Besides the [`MagicEnvelope::parse`] errors, fails with
    /// [`ProtocolError::UnsupportedContentType`] for non-XML envelope
    /// serializations.
    pub fn from_data(body: &[u8], content_type: &str) -> ProtocolResult<Self> {
        let media_type = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match media_type.as_str() {
            "application/magic-envelope+xml" | "application/atom+xml" | "application/xml"
            | "text/xml" => {
                let xml = std::str::from_utf8(body)
                    .map_err(|e| ProtocolError::MalformedXml(e.to_string()))?;
                Self::parse(xml)
            }
            other => Err(ProtocolError::UnsupportedContentType(other.to_string())),
        }
    }

    /// Whether the signature checks out against a magic public key.
    ///
    /// Returns `false` rather than erroring: an unparseable key and a
    /// forged signature both mean the envelope cannot be trusted.
    #[must_use]
    pub fn verified(&self, public_key: &str) -> bool {
        let key = match crypto::MagicKey::decode(public_key) {
            Ok(key) => key,
            Err(err) => {
                tracing::warn!(%err, "rejecting envelope, public key does not parse");
                return false;
            }
        };

        crypto::emsa_verify(self.plaintext.as_bytes(), &self.signature, &key)
    }

    /// Serialize as a `<me:env>` document.
    ///
    /// # Errors
    ///
    /// Fails only on writer errors.
    pub fn to_xml(&self) -> ProtocolResult<String> {
        let mut writer = XmlWriter::new();

        writer.start("me:env", &[("xmlns:me", MAGIC_ENV_NS)])?;
        writer.text_element("me:data", &[("type", &self.data_type)], &self.armored_data)?;
        writer.text_element("me:encoding", &[], &self.encoding)?;
        writer.text_element("me:alg", &[], &self.algorithm)?;
        writer.text_element("me:sig", &[], &armor::encode(&self.signature))?;
        writer.end("me:env")?;

        writer.finish()
    }

    /// The activity carried in the payload.
    #[must_use]
    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    /// The decoded payload bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The payload content type, defaulted when absent on the wire.
    #[must_use]
    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    /// The armor encoding, defaulted when absent on the wire.
    #[must_use]
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// The signature algorithm, defaulted when absent on the wire.
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// The raw signature bytes.
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}

/// The signed plaintext: four armored segments joined with `.`, where a
/// `None` field is an empty segment.
fn signing_plaintext(
    armored_data: &str,
    data_type: Option<&str>,
    encoding: Option<&str>,
    algorithm: Option<&str>,
) -> String {
    let segment = |field: Option<&str>| field.map(|v| armor::encode(v.as_bytes())).unwrap_or_default();

    format!(
        "{armored_data}.{}.{}.{}",
        segment(data_type),
        segment(encoding),
        segment(algorithm),
    )
}

fn parse_payload(data: &[u8], data_type: &str) -> ProtocolResult<Activity> {
    match data_type {
        "application/atom+xml" | "application/xml" | "text/xml" => {
            let xml = std::str::from_utf8(data)
                .map_err(|e| ProtocolError::MalformedXml(e.to_string()))?;
            entry::parse_activity(xml)
        }
        other => Err(ProtocolError::UnsupportedContentType(other.to_string())),
    }
}

fn child<'a, 'input>(env: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    env.children()
        .filter(Node::is_element)
        .find(|n| n.has_tag_name((MAGIC_ENV_NS, name)))
}

fn text_of(node: Node<'_, '_>) -> String {
    node.text().unwrap_or_default().trim().to_string()
}
