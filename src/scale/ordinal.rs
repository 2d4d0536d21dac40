//! Discrete keys mapped onto a categorical palette.

use super::ScaleError;
use super::colour::color_to_hex;
use serde::Serialize;

/// Assigns palette entries to discrete keys in the order given, cycling the
/// palette when keys outnumber it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrdinalScale<K> {
    domain: Vec<K>,
    palette: Vec<String>,
}

impl<K: PartialEq + Clone> OrdinalScale<K> {
    /// Builds the scale over the distinct `keys`. Palette entries may be any
    /// CSS colour and are stored as `#rrggbb`.
    ///
    /// # Errors
    ///
    /// Fails on an empty palette or key set, or an unparseable colour.
    pub fn new(keys: &[K], palette: &[&str]) -> Result<Self, ScaleError> {
        if palette.is_empty() {
            return Err(ScaleError::EmptyPalette);
        }
        let mut domain: Vec<K> = Vec::with_capacity(keys.len());
        for key in keys {
            if !domain.contains(key) {
                domain.push(key.clone());
            }
        }
        if domain.is_empty() {
            return Err(ScaleError::EmptyDomain { scale: "ordinal" });
        }
        let palette = palette
            .iter()
            .map(|c| color_to_hex(c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { domain, palette })
    }

    pub fn map(&self, key: &K) -> Option<&str> {
        self.domain
            .iter()
            .position(|k| k == key)
            .map(|i| self.palette[i % self.palette.len()].as_str())
    }

    pub fn domain(&self) -> &[K] {
        &self.domain
    }
}
