//! Energy carriers: the commodity types flowing through buses.
use crate::id::define_id_type;

define_id_type! {CarrierID}

/// The carrier of every demand, feed-in and storage bus.
pub const ELECTRICITY: &str = "electricity";

/// The carrier of the existing gas network.
pub const NATURAL_GAS: &str = "natural_gas";

/// Synthetic gas produced by power-to-gas units.
pub const SYNTHETIC_GAS: &str = "sng";

/// Carriers modelled as one global resource pool shared by all regions.
///
/// Each of these gets a single global bus fed by an unconstrained source at a
/// flat price, plus a lossless pass-through into every region.
pub const GLOBAL_CARRIERS: [&str; 3] = ["natural_gas", "coal", "uranium"];

/// Whether a carrier is drawn from a global resource pool.
pub fn is_global(carrier: &CarrierID) -> bool {
    GLOBAL_CARRIERS.contains(&carrier.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_global() {
        assert!(is_global(&CarrierID::new("coal")));
        assert!(is_global(&CarrierID::new("natural_gas")));
        assert!(is_global(&CarrierID::new("uranium")));
        assert!(!is_global(&CarrierID::new(ELECTRICITY)));
        assert!(!is_global(&CarrierID::new(SYNTHETIC_GAS)));
    }
}
