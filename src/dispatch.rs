//! Ambulance selection
//!
//! Classifies the caller's description by acuity and draws a vehicle, driver
//! and contact number from the fleet roster.

use rand::seq::SliceRandom;
use rand::Rng;

/// Ambulance category, chosen by acuity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbulanceType {
    /// High-acuity: ICU-equipped vehicle
    IcuSuperSpeciality,
    /// Default category
    BasicLifeSupport,
}

impl AmbulanceType {
    pub fn label(self) -> &'static str {
        match self {
            AmbulanceType::IcuSuperSpeciality => "ICU - Super Speciality Ambulance",
            AmbulanceType::BasicLifeSupport => "Basic Life Support Ambulance",
        }
    }
}

impl std::fmt::Display for AmbulanceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An ambulance assigned to a call. Immutable once drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbulanceAssignment {
    pub ambulance_type: AmbulanceType,
    pub vehicle_number: String,
    pub driver_name: String,
    pub driver_number: String,
}

const HIGH_ACUITY_KEYWORDS: &[&str] = &[
    "accident",
    "multiple injuries",
    "high blood loss",
    "unconscious",
    "critical",
    "severe",
    "chest pain",
];

const VEHICLE_NUMBERS: &[&str] = &[
    "WB 01 AB 1234",
    "WB 02 CD 5678",
    "WB 03 EF 9101",
    "WB 04 GH 1121",
];

const DRIVERS: &[&str] = &["Rajesh Kumar", "Suresh Singh", "Anil Sharma", "Vikas Patel"];

const DRIVER_NUMBER_PREFIX: &str = "+91 98765";

/// Fleet roster and acuity policy
///
/// Draws are independent per call; nothing tracks whether a vehicle or
/// driver is already out on another job.
#[derive(Debug, Clone)]
pub struct Fleet {
    pub high_acuity_keywords: Vec<String>,
    pub vehicle_numbers: Vec<String>,
    pub drivers: Vec<String>,
    pub driver_number_prefix: String,
}

impl Default for Fleet {
    fn default() -> Self {
        Self {
            high_acuity_keywords: HIGH_ACUITY_KEYWORDS.iter().map(|s| (*s).to_string()).collect(),
            vehicle_numbers: VEHICLE_NUMBERS.iter().map(|s| (*s).to_string()).collect(),
            drivers: DRIVERS.iter().map(|s| (*s).to_string()).collect(),
            driver_number_prefix: DRIVER_NUMBER_PREFIX.to_string(),
        }
    }
}

impl Fleet {
    /// Classify a free-text description. Case-insensitive substring match.
    pub fn classify(&self, description: &str) -> AmbulanceType {
        let description = description.to_lowercase();
        if self
            .high_acuity_keywords
            .iter()
            .any(|keyword| description.contains(keyword.as_str()))
        {
            AmbulanceType::IcuSuperSpeciality
        } else {
            AmbulanceType::BasicLifeSupport
        }
    }

    /// Classify the description and draw a vehicle, driver and number
    pub fn assign<R: Rng + ?Sized>(&self, description: &str, rng: &mut R) -> AmbulanceAssignment {
        let ambulance_type = self.classify(description);
        let vehicle_number = self
            .vehicle_numbers
            .choose(rng)
            .cloned()
            .unwrap_or_default();
        let driver_name = self.drivers.choose(rng).cloned().unwrap_or_default();
        let suffix: u32 = rng.gen_range(10_000..=99_999);

        AmbulanceAssignment {
            ambulance_type,
            vehicle_number,
            driver_name,
            driver_number: format!("{} {suffix}", self.driver_number_prefix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_chest_pain_is_high_acuity_in_any_case() {
        let fleet = Fleet::default();
        assert_eq!(
            fleet.classify("Sudden CHEST PAIN while walking"),
            AmbulanceType::IcuSuperSpeciality
        );
        assert_eq!(
            fleet.classify("chest pain"),
            AmbulanceType::IcuSuperSpeciality
        );
    }

    #[test]
    fn test_routine_checkup_is_basic() {
        let fleet = Fleet::default();
        assert_eq!(
            fleet.classify("routine checkup"),
            AmbulanceType::BasicLifeSupport
        );
        assert_eq!(fleet.classify(""), AmbulanceType::BasicLifeSupport);
    }

    #[test]
    fn test_assignment_draws_from_roster() {
        let fleet = Fleet::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let a = fleet.assign("Patient unconscious, bleeding heavily", &mut rng);
            assert_eq!(a.ambulance_type, AmbulanceType::IcuSuperSpeciality);
            assert!(VEHICLE_NUMBERS.contains(&a.vehicle_number.as_str()));
            assert!(DRIVERS.contains(&a.driver_name.as_str()));

            let suffix = a
                .driver_number
                .strip_prefix("+91 98765 ")
                .expect("driver number prefix");
            let suffix: u32 = suffix.parse().expect("numeric suffix");
            assert!((10_000..=99_999).contains(&suffix));
        }
    }

    #[test]
    fn test_same_seed_same_assignment() {
        let fleet = Fleet::default();
        let a = fleet.assign("fall", &mut StdRng::seed_from_u64(42));
        let b = fleet.assign("fall", &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_fleet_keywords() {
        let fleet = Fleet {
            high_acuity_keywords: vec!["stroke".to_string()],
            ..Fleet::default()
        };
        assert_eq!(fleet.classify("possible Stroke"), AmbulanceType::IcuSuperSpeciality);
        assert_eq!(fleet.classify("accident"), AmbulanceType::BasicLifeSupport);
    }
}
