use std::collections::BTreeMap;

use rustc_hash::FxHashSet;

use crate::error::{Error, Result};

/// A benchmarking machine whose results are included in the report
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Host {
    /// The short hostname, which is also the name of its directory
    pub id: String,
    /// The machine description shown in the column heading
    pub name: String,
}

impl Host {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A group of implementations rendered together under one heading
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    /// The rotated label spanning the section's rows
    pub heading: String,
    /// Selects the language label table used for the section's rows
    pub field: String,
    /// Implementation identifiers, in display order
    pub implementations: Vec<String>,
}

impl Section {
    pub fn new(
        heading: impl Into<String>,
        field: impl Into<String>,
        implementations: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            heading: heading.into(),
            field: field.into(),
            implementations: implementations
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

/// Display metadata of one implementation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Implementation {
    /// Human-readable name
    pub name: String,
    /// Language/field class, looked up in the section's label table
    pub tag: Option<String>,
}

impl Implementation {
    pub fn new(name: impl Into<String>, tag: Option<&str>) -> Self {
        Self {
            name: name.into(),
            tag: tag.map(str::to_owned),
        }
    }
}

/// Everything about the report that is fixed rather than measured.
///
/// The configuration is an immutable value handed to the loader and the
/// renderer; nothing in the pipeline reads global state.
#[derive(Clone, Debug)]
pub struct Config {
    pub caption: String,
    pub label: String,
    /// Printed below the table
    pub note: String,
    /// The host allow-list, in column order
    pub hosts: Vec<Host>,
    /// Sections, in display order
    pub sections: Vec<Section>,
    pub implementations: BTreeMap<String, Implementation>,
    /// Per section field: tag -> language label
    pub field_labels: BTreeMap<String, BTreeMap<String, String>>,
}

impl Config {
    /// The hosts, sections and display metadata compiled into the binary
    pub fn builtin() -> Self {
        let hosts = vec![
            Host::new("kivsa", "Intel Core i7-6770HQ (Skylake)"),
            Host::new("nakhash", "AMD Ryzen 7 1800X (Zen)"),
        ];

        let curve25519 = [
            ("crypto_scalarmult/curve25519/fiat64", "fiat-crypto", Some("fiat")),
            ("crypto_scalarmult/curve25519/donna_c64", "donna-c64", Some("c")),
            ("crypto_scalarmult/curve25519/amd64-51", "amd64-51", Some("asm")),
            ("crypto_scalarmult/curve25519/amd64-64", "amd64-64", Some("asm")),
            ("crypto_scalarmult/curve25519/sandy2x", "sandy2x", Some("avx")),
            ("crypto_scalarmult/curve25519/ref10", "ref10", Some("c")),
            ("crypto_scalarmult/curve25519/ref", "ref", None),
        ];
        let p256 = [
            ("crypto_scalarmult/nistp256/fiat64", "fiat-crypto", Some("fiat")),
            ("crypto_scalarmult/nistp256/openssl", "OpenSSL", Some("asm")),
            ("crypto_scalarmult/nistp256/bearssl", "BearSSL", Some("c")),
        ];

        let mut implementations = BTreeMap::new();
        for &(id, name, tag) in curve25519.iter().chain(p256.iter()) {
            implementations.insert(id.to_owned(), Implementation::new(name, tag));
        }

        let sections = vec![
            Section::new(
                "Curve25519",
                "25519",
                curve25519.iter().map(|(id, ..)| *id),
            ),
            Section::new("P-256", "p256", p256.iter().map(|(id, ..)| *id)),
        ];

        fn labels(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
            entries
                .iter()
                .map(|(tag, label)| (tag.to_string(), label.to_string()))
                .collect()
        }

        let field_labels = BTreeMap::from([
            (
                "25519".to_owned(),
                labels(&[
                    ("fiat", "C (gen.)"),
                    ("c", "C"),
                    ("asm", "asm"),
                    ("avx", "asm (AVX)"),
                ]),
            ),
            (
                "p256".to_owned(),
                labels(&[("fiat", "C (gen.)"), ("c", "C"), ("asm", "asm")]),
            ),
        ]);

        Self {
            caption: "Scalar multiplication performance (best cycle count over compilers and flags, in thousands)".to_owned(),
            label: "tab:supercop".to_owned(),
            note: "Values are SUPERCOP cycle counts divided by 1000. The fastest implementation of each column and section is in bold; ratios are relative to it. The last column is the geometric mean over all machines.".to_owned(),
            hosts,
            sections,
            implementations,
            field_labels,
        }
    }

    /// Checks that the configuration is internally consistent.
    ///
    /// Every implementation listed by a section must have display metadata,
    /// and hosts must be unique and non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.hosts.is_empty() {
            return Err(Error::NoHosts);
        }

        let mut seen = FxHashSet::default();
        for host in &self.hosts {
            if !seen.insert(host.id.as_str()) {
                return Err(Error::DuplicateHost(host.id.clone()));
            }
        }

        for section in &self.sections {
            for id in &section.implementations {
                self.implementation(id)?;
            }
        }

        Ok(())
    }

    /// The host identifiers, in column order
    pub fn host_ids(&self) -> impl Iterator<Item = &str> {
        self.hosts
            .iter()
            .map(|host| host.id.as_str())
    }

    /// Returns the display metadata of `id`
    pub fn implementation(&self, id: &str) -> Result<&Implementation> {
        self.implementations
            .get(id)
            .ok_or_else(|| Error::UnknownImplementation(id.to_owned()))
    }

    /// Returns the short language label of `id` within `section`.
    ///
    /// A tag without an entry in the section's label table is returned as is;
    /// an implementation without a tag gets a `-` followed by the last
    /// component of its identifier.
    pub fn language_label(&self, section: &Section, id: &str) -> Result<String> {
        let implementation = self.implementation(id)?;
        let Some(tag) = &implementation.tag else {
            let short = id.rsplit('/').next().unwrap_or(id);
            return Ok(format!("-{short}"));
        };

        let label = self
            .field_labels
            .get(&section.field)
            .and_then(|labels| labels.get(tag))
            .unwrap_or(tag);
        Ok(label.clone())
    }
}
