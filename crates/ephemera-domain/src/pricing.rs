//! Pricing module - the quote calculator that produces ephemeral resources
//!
//! Three monitoring variants, each priced as `unit_price × quantity` from a
//! flat rate card. The calculator is a pure function; rates are configured
//! by the operator and passed in.

use std::fmt;

/// Coverage zone for vehicle movement monitoring.
///
/// Selects between the two movement rates; the other variants are
/// zone-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Coverage inside the home country
    Domestic,
    /// Coverage abroad
    Abroad,
}

impl Zone {
    /// Get the zone name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Domestic => "domestic",
            Zone::Abroad => "abroad",
        }
    }

    /// Parse a zone from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "domestic" => Some(Zone::Domestic),
            "abroad" => Some(Zone::Abroad),
            _ => None,
        }
    }
}

impl std::str::FromStr for Zone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid zone: {}", s))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the buyer selected on the calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitoringSelection {
    /// Vehicle movement monitoring, priced per vehicle by zone
    VehicleMovement {
        /// Coverage zone
        zone: Zone,
        /// Number of vehicles
        vehicles: u32,
    },
    /// Fuel level monitoring, priced per tank. The number of vehicles
    /// carrying the tanks does not enter the price.
    Fuel {
        /// Number of fuel tanks
        tanks: u32,
    },
    /// Refrigeration temperature monitoring, priced per sensor
    Refrigeration {
        /// Number of refrigerated units
        refrigerators: u32,
        /// Number of temperature sensors
        sensors: u32,
    },
}

/// Per-unit rates configured by the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct RateCard {
    /// Per-vehicle rate, domestic movement monitoring
    pub movement_domestic: f64,
    /// Per-vehicle rate, movement monitoring abroad
    pub movement_abroad: f64,
    /// Per-tank rate, fuel monitoring
    pub fuel_tank: f64,
    /// Per-sensor rate, refrigeration monitoring
    pub refrigeration_sensor: f64,
}

impl Default for RateCard {
    fn default() -> Self {
        Self {
            movement_domestic: 4000.0,
            movement_abroad: 4000.0,
            fuel_tank: 1000.0,
            refrigeration_sensor: 500.0,
        }
    }
}

/// A computed quote.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Rate applied per unit
    pub unit_price: f64,
    /// Number of billable units
    pub quantity: u32,
    /// `unit_price × quantity`
    pub total: f64,
}

impl Quote {
    /// Total truncated to whole currency units for display.
    pub fn display_total(&self) -> u64 {
        self.total.max(0.0).trunc() as u64
    }
}

/// Compute a quote for a selection against a rate card.
pub fn quote(rates: &RateCard, selection: &MonitoringSelection) -> Quote {
    let (unit_price, quantity) = match selection {
        MonitoringSelection::VehicleMovement { zone, vehicles } => {
            let rate = match zone {
                Zone::Domestic => rates.movement_domestic,
                Zone::Abroad => rates.movement_abroad,
            };
            (rate, *vehicles)
        }
        MonitoringSelection::Fuel { tanks } => (rates.fuel_tank, *tanks),
        MonitoringSelection::Refrigeration { sensors, .. } => {
            (rates.refrigeration_sensor, *sensors)
        }
    };

    Quote {
        unit_price,
        quantity,
        total: (unit_price * f64::from(quantity)).max(0.0),
    }
}

/// Vehicle identification captured alongside vehicle-based selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleDetails {
    /// Manufacturer
    pub make: String,
    /// Model
    pub model: String,
    /// Production year
    pub year: u32,
}

/// A full quote request as submitted by the buyer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    /// What is being monitored
    pub selection: MonitoringSelection,
    /// Vehicle details; required for the vehicle-based variants
    pub vehicle: Option<VehicleDetails>,
}

/// Production-year bounds accepted on quote requests.
const YEAR_RANGE: std::ops::RangeInclusive<u32> = 1900..=2027;

/// Validate a quote request, returning every violation found.
///
/// An empty result means the request is acceptable.
pub fn validate(request: &QuoteRequest) -> Vec<String> {
    let mut errors = Vec::new();

    let needs_vehicle = !matches!(
        request.selection,
        MonitoringSelection::Refrigeration { .. }
    );

    if needs_vehicle {
        match &request.vehicle {
            None => errors.push("Vehicle make, model and year are required".to_string()),
            Some(vehicle) => {
                if vehicle.make.trim().is_empty() {
                    errors.push("Vehicle make is required".to_string());
                }
                if vehicle.model.trim().is_empty() {
                    errors.push("Vehicle model is required".to_string());
                }
                if !YEAR_RANGE.contains(&vehicle.year) {
                    errors.push(format!(
                        "Production year must be between {} and {}",
                        YEAR_RANGE.start(),
                        YEAR_RANGE.end()
                    ));
                }
            }
        }
    }

    match &request.selection {
        MonitoringSelection::VehicleMovement { vehicles, .. } => {
            if *vehicles < 1 {
                errors.push("At least one vehicle is required".to_string());
            }
        }
        MonitoringSelection::Fuel { .. } => {
            // Tank count zero is allowed: a fuel quote with no tanks prices
            // to zero rather than failing validation.
        }
        MonitoringSelection::Refrigeration {
            refrigerators,
            sensors,
        } => {
            if *refrigerators < 1 {
                errors.push("At least one refrigerated unit is required".to_string());
            }
            if *sensors < 1 {
                errors.push("At least one sensor is required".to_string());
            }
        }
    }

    errors
}

/// Human-readable title for the ephemeral product a quote produces.
pub fn display_name(selection: &MonitoringSelection, buyer_id: u64) -> String {
    match selection {
        MonitoringSelection::VehicleMovement { zone, vehicles } => format!(
            "Vehicle movement monitoring - {} vehicles ({}) - buyer #{}",
            vehicles, zone, buyer_id
        ),
        MonitoringSelection::Fuel { tanks } => {
            format!("Fuel monitoring - {} tanks - buyer #{}", tanks, buyer_id)
        }
        MonitoringSelection::Refrigeration {
            refrigerators,
            sensors,
        } => format!(
            "Refrigeration monitoring - {} units, {} sensors - buyer #{}",
            refrigerators, sensors, buyer_id
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle() -> Option<VehicleDetails> {
        Some(VehicleDetails {
            make: "Volvo".to_string(),
            model: "FH16".to_string(),
            year: 2021,
        })
    }

    #[test]
    fn test_movement_quote_by_zone() {
        let rates = RateCard {
            movement_domestic: 4000.0,
            movement_abroad: 6000.0,
            ..Default::default()
        };

        let domestic = quote(
            &rates,
            &MonitoringSelection::VehicleMovement {
                zone: Zone::Domestic,
                vehicles: 3,
            },
        );
        assert_eq!(domestic.unit_price, 4000.0);
        assert_eq!(domestic.total, 12_000.0);

        let abroad = quote(
            &rates,
            &MonitoringSelection::VehicleMovement {
                zone: Zone::Abroad,
                vehicles: 3,
            },
        );
        assert_eq!(abroad.total, 18_000.0);
    }

    #[test]
    fn test_fuel_priced_by_tanks_only() {
        let rates = RateCard::default();
        let q = quote(&rates, &MonitoringSelection::Fuel { tanks: 4 });
        assert_eq!(q.unit_price, 1000.0);
        assert_eq!(q.quantity, 4);
        assert_eq!(q.total, 4000.0);

        // Zero tanks is a valid zero-price quote
        let q = quote(&rates, &MonitoringSelection::Fuel { tanks: 0 });
        assert_eq!(q.total, 0.0);
    }

    #[test]
    fn test_refrigeration_priced_per_sensor() {
        let rates = RateCard::default();
        let q = quote(
            &rates,
            &MonitoringSelection::Refrigeration {
                refrigerators: 2,
                sensors: 5,
            },
        );
        assert_eq!(q.unit_price, 500.0);
        assert_eq!(q.quantity, 5);
        assert_eq!(q.total, 2500.0);
    }

    #[test]
    fn test_display_total_truncates() {
        let q = Quote {
            unit_price: 99.9,
            quantity: 3,
            total: 299.7,
        };
        assert_eq!(q.display_total(), 299);
    }

    #[test]
    fn test_validate_movement_request() {
        let ok = QuoteRequest {
            selection: MonitoringSelection::VehicleMovement {
                zone: Zone::Domestic,
                vehicles: 1,
            },
            vehicle: vehicle(),
        };
        assert!(validate(&ok).is_empty());

        let missing_vehicle = QuoteRequest {
            vehicle: None,
            ..ok.clone()
        };
        assert_eq!(validate(&missing_vehicle).len(), 1);

        let bad_year = QuoteRequest {
            vehicle: Some(VehicleDetails {
                make: "Volvo".to_string(),
                model: "FH16".to_string(),
                year: 1899,
            }),
            ..ok.clone()
        };
        assert!(validate(&bad_year)[0].contains("1900"));

        let zero_vehicles = QuoteRequest {
            selection: MonitoringSelection::VehicleMovement {
                zone: Zone::Domestic,
                vehicles: 0,
            },
            vehicle: vehicle(),
        };
        assert_eq!(validate(&zero_vehicles).len(), 1);
    }

    #[test]
    fn test_validate_refrigeration_needs_no_vehicle() {
        let request = QuoteRequest {
            selection: MonitoringSelection::Refrigeration {
                refrigerators: 1,
                sensors: 2,
            },
            vehicle: None,
        };
        assert!(validate(&request).is_empty());

        let zeroes = QuoteRequest {
            selection: MonitoringSelection::Refrigeration {
                refrigerators: 0,
                sensors: 0,
            },
            vehicle: None,
        };
        assert_eq!(validate(&zeroes).len(), 2);
    }

    #[test]
    fn test_display_name_variants() {
        let name = display_name(
            &MonitoringSelection::VehicleMovement {
                zone: Zone::Abroad,
                vehicles: 2,
            },
            17,
        );
        assert!(name.contains("2 vehicles"));
        assert!(name.contains("abroad"));
        assert!(name.contains("#17"));

        let name = display_name(&MonitoringSelection::Fuel { tanks: 3 }, 17);
        assert!(name.contains("3 tanks"));
    }
}
