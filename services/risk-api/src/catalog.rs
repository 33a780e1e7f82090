//! Catalog of impact functions the service can run.

use serde::Serialize;

/// Metadata describing one impact function.
#[derive(Debug, Clone, Serialize)]
pub struct ImpactFunction {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub author: &'static str,
}

/// Every impact function this build of the service knows. New functions are
/// added here and shipped with a release; there is no runtime registration.
pub const IMPACT_FUNCTIONS: &[ImpactFunction] = &[ImpactFunction {
    id: "earthquake_fatality",
    name: "Earthquake fatality model",
    description: "Estimated fatalities per cell as 10^(a*H - b) * E from \
                  ground shaking H and population exposure E",
    author: "Allen (2010)",
}];

/// Look up an impact function by id.
pub fn find(id: &str) -> Option<&'static ImpactFunction> {
    IMPACT_FUNCTIONS.iter().find(|f| f.id == id)
}
