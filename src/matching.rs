//! Identifying triple used to pair a CoreGraphics display with its IOKit
//! service.

/// Vendor, product, and serial numbers reported by CoreGraphics for one
/// display. The same three fields appear in an `IODisplayConnect` service's
/// info dictionary, which is how the two registries get matched up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayTriple {
    pub vendor: u32,
    pub product: u32,
    pub serial: u32,
}

impl DisplayTriple {
    /// Compare against the fields read out of a service's info dictionary.
    /// A field that is missing from the dictionary counts as zero.
    pub fn matches(
        &self,
        vendor: Option<i64>,
        product: Option<i64>,
        serial: Option<i64>,
    ) -> bool {
        numeric_field_matches(vendor, self.vendor)
            && numeric_field_matches(product, self.product)
            && numeric_field_matches(serial, self.serial)
    }
}

fn numeric_field_matches(actual: Option<i64>, expected: u32) -> bool {
    match actual {
        Some(value) => value == i64::from(expected),
        None => expected == 0,
    }
}
