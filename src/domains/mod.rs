//! The four scenario profiles and their process-wide cache
//!
//! Each profile is built on first use, exactly once, and shared read-only
//! afterwards. A failed build is cached as well: the profile stays unavailable
//! until the process restarts.

pub mod air_quality;
pub mod comfort;
pub mod light;
pub mod plant_care;

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::engine::{DefinitionError, DomainProfile};
use crate::error::FuzzyError;

// ============================================================================
// Domain
// ============================================================================

/// Closed set of scenario domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    Comfort,
    AirQuality,
    LightComfort,
    PlantCare,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Comfort,
        Domain::AirQuality,
        Domain::LightComfort,
        Domain::PlantCare,
    ];

    /// Route segment and CLI name
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Comfort => "comfort",
            Domain::AirQuality => "air-quality",
            Domain::LightComfort => "light-comfort",
            Domain::PlantCare => "plant-care",
        }
    }

    /// Message returned when the profile cannot be built
    pub fn unavailable_message(&self) -> &'static str {
        match self {
            Domain::Comfort => "Fuzzy logic system is not initialised",
            Domain::AirQuality => "Air quality fuzzy system is not initialised",
            Domain::LightComfort => "Light comfort fuzzy system is not initialised",
            Domain::PlantCare => "Plant care fuzzy system is not initialised",
        }
    }

    fn cache(&self) -> &'static LazyProfile {
        match self {
            Domain::Comfort => &COMFORT,
            Domain::AirQuality => &AIR_QUALITY,
            Domain::LightComfort => &LIGHT_COMFORT,
            Domain::PlantCare => &PLANT_CARE,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = FuzzyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "comfort" => Ok(Domain::Comfort),
            "air-quality" | "air" => Ok(Domain::AirQuality),
            "light-comfort" | "light" => Ok(Domain::LightComfort),
            "plant-care" | "plant" => Ok(Domain::PlantCare),
            _ => Err(FuzzyError::unknown_profile(s)),
        }
    }
}

// ============================================================================
// Lazy profile cache
// ============================================================================

/// Build state reported by `/health`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
    /// Never requested
    Pending,
    Ready,
    /// Build failed; cached until restart
    Unavailable,
}

/// A profile built at most once per process.
///
/// Concurrent first callers block on the same initialisation; the outcome,
/// success or failure, is what every later caller sees.
pub struct LazyProfile {
    domain: Domain,
    build: fn() -> Result<DomainProfile, DefinitionError>,
    cell: OnceLock<Result<DomainProfile, DefinitionError>>,
}

impl LazyProfile {
    pub const fn new(domain: Domain, build: fn() -> Result<DomainProfile, DefinitionError>) -> Self {
        Self {
            domain,
            build,
            cell: OnceLock::new(),
        }
    }

    /// The built profile, building it on first call
    pub fn get(&self) -> Result<&DomainProfile, FuzzyError> {
        let result = self.cell.get_or_init(|| {
            debug!(domain = %self.domain, "building fuzzy profile");
            match (self.build)() {
                Ok(profile) => {
                    info!(
                        domain = %self.domain,
                        rules = profile.rules().len(),
                        "fuzzy profile ready"
                    );
                    Ok(profile)
                }
                Err(e) => {
                    error!(domain = %self.domain, error = %e, "fuzzy profile failed to build");
                    Err(e)
                }
            }
        });

        result.as_ref().map_err(|e| {
            FuzzyError::profile_unavailable(self.domain.unavailable_message())
                .with_context("profile", self.domain.as_str())
                .with_cause(e.to_string())
        })
    }

    pub fn status(&self) -> ProfileStatus {
        match self.cell.get() {
            None => ProfileStatus::Pending,
            Some(Ok(_)) => ProfileStatus::Ready,
            Some(Err(_)) => ProfileStatus::Unavailable,
        }
    }
}

static COMFORT: LazyProfile = LazyProfile::new(Domain::Comfort, comfort::build);
static AIR_QUALITY: LazyProfile = LazyProfile::new(Domain::AirQuality, air_quality::build);
static LIGHT_COMFORT: LazyProfile = LazyProfile::new(Domain::LightComfort, light::build);
static PLANT_CARE: LazyProfile = LazyProfile::new(Domain::PlantCare, plant_care::build);

/// Shared profile for a domain, built on first use
pub fn get_profile(domain: Domain) -> Result<&'static DomainProfile, FuzzyError> {
    domain.cache().get()
}

/// Build state of a domain's profile without triggering a build
pub fn profile_status(domain: Domain) -> ProfileStatus {
    domain.cache().status()
}

/// Build every profile up front, returning the domains that failed
pub fn warm_up() -> Vec<(Domain, FuzzyError)> {
    Domain::ALL
        .iter()
        .filter_map(|&domain| get_profile(domain).err().map(|e| (domain, e)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static FAILED_BUILDS: AtomicUsize = AtomicUsize::new(0);

    fn failing_build() -> Result<DomainProfile, DefinitionError> {
        FAILED_BUILDS.fetch_add(1, Ordering::SeqCst);
        Err(DefinitionError::NoRules("broken".to_string()))
    }

    #[test]
    fn test_failed_build_is_cached() {
        let lazy = LazyProfile::new(Domain::AirQuality, failing_build);
        assert_eq!(lazy.status(), ProfileStatus::Pending);

        for _ in 0..3 {
            let err = lazy.get().unwrap_err();
            assert_eq!(err.code, ErrorCode::ProfileUnavailable);
            assert_eq!(err.message, "Air quality fuzzy system is not initialised");
            assert_eq!(err.http_status(), 500);
        }

        assert_eq!(FAILED_BUILDS.load(Ordering::SeqCst), 1);
        assert_eq!(lazy.status(), ProfileStatus::Unavailable);
    }

    #[test]
    fn test_concurrent_first_use_builds_once() {
        static BUILDS: AtomicUsize = AtomicUsize::new(0);
        fn counted_build() -> Result<DomainProfile, DefinitionError> {
            BUILDS.fetch_add(1, Ordering::SeqCst);
            comfort::build()
        }

        let lazy = LazyProfile::new(Domain::Comfort, counted_build);
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| assert!(lazy.get().is_ok()));
            }
        });

        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
        assert_eq!(lazy.status(), ProfileStatus::Ready);
    }

    #[test]
    fn test_shared_profiles_are_the_same_instance() {
        let first = get_profile(Domain::PlantCare).unwrap();
        let second = get_profile(Domain::PlantCare).unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(profile_status(Domain::PlantCare), ProfileStatus::Ready);
    }

    #[test]
    fn test_every_profile_builds() {
        assert!(warm_up().is_empty());
    }

    #[test]
    fn test_domain_names() {
        for domain in Domain::ALL {
            assert_eq!(domain.as_str().parse::<Domain>().unwrap(), domain);
        }
        assert_eq!("Air_Quality".parse::<Domain>().unwrap(), Domain::AirQuality);
        assert!("weather".parse::<Domain>().is_err());
    }
}
