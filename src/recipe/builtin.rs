// src/recipe/builtin.rs

//! Recipes compiled into the binary
//!
//! These are always available, even without any recipe directory. A recipe
//! file of the same name in a scanned directory takes precedence.

use crate::error::Result;
use crate::recipe::traits::Recipe;
use crate::recipe::types::{
    BuildSystem, DependencyConstraint, Metadata, PhaseSet, VersionRecord,
};
use crate::version::{Version, VersionRange};
use std::sync::Arc;

/// Every builtin recipe
pub fn builtin_recipes() -> Result<Vec<Arc<dyn Recipe>>> {
    Ok(vec![Arc::new(PerlDbi::new()?)])
}

/// Perl's database independent interface (DBI)
///
/// Configured with the stock `perl Makefile.PL`; no extra arguments.
#[derive(Debug, Clone)]
pub struct PerlDbi {
    metadata: Metadata,
    versions: Vec<VersionRecord>,
    dependencies: Vec<DependencyConstraint>,
}

impl PerlDbi {
    pub const NAME: &'static str = "perl-dbi";

    pub fn new() -> Result<Self> {
        Ok(Self {
            metadata: Metadata {
                homepage: "https://metacpan.org/pod/DBI".to_string(),
                url: "https://cpan.metacpan.org/authors/id/T/TI/TIMB/DBI-1.643.tar.gz".to_string(),
                maintainers: vec!["EbiArnie".to_string()],
                description: Some("Database independent interface for Perl".to_string()),
                build_system: BuildSystem::Perl,
            },
            versions: vec![VersionRecord::new(
                "1.643",
                "8a2b993db560a2c373c174ee976a51027dd780ec766ae17620c20393d2e836fa",
            )?],
            dependencies: vec![DependencyConstraint::new(
                "perl",
                VersionRange::at_least(Version::parse("5.8.1")?),
                PhaseSet::all(),
            )?],
        })
    }
}

impl Recipe for PerlDbi {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn versions(&self) -> &[VersionRecord] {
        &self.versions
    }

    fn dependencies(&self) -> &[DependencyConstraint] {
        &self.dependencies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::BuildContext;
    use crate::recipe::parser::validate_recipe;
    use crate::recipe::types::DependencyPhase;

    #[test]
    fn test_perl_dbi_metadata() {
        let dbi = PerlDbi::new().unwrap();
        assert_eq!(dbi.name(), "perl-dbi");
        assert_eq!(dbi.metadata().homepage, "https://metacpan.org/pod/DBI");
        assert_eq!(dbi.metadata().maintainers, vec!["EbiArnie"]);
        assert_eq!(dbi.metadata().build_system, BuildSystem::Perl);
    }

    #[test]
    fn test_perl_dbi_versions() {
        let dbi = PerlDbi::new().unwrap();
        let default = dbi.default_version().unwrap();
        assert_eq!(default.version.as_str(), "1.643");
        assert_eq!(
            default.sha256.as_str(),
            "8a2b993db560a2c373c174ee976a51027dd780ec766ae17620c20393d2e836fa"
        );

        let url = dbi.url_for_version(&default.version).unwrap();
        assert!(url.ends_with("DBI-1.643.tar.gz"));
    }

    #[test]
    fn test_perl_dbi_depends_on_perl_everywhere() {
        let dbi = PerlDbi::new().unwrap();
        for phase in DependencyPhase::ALL {
            let deps = dbi.dependencies_for(phase);
            assert_eq!(deps.len(), 1);
            assert_eq!(deps[0].to_string(), "perl@5.8.1:");
        }
    }

    #[test]
    fn test_perl_dbi_configure_args_empty() {
        let dbi = PerlDbi::new().unwrap();
        let ctx = BuildContext::from_parts(Some("gcc@13.2.0"), None, &["+threads".to_string()])
            .unwrap();
        assert!(dbi.configure_args(&ctx).unwrap().is_empty());
        assert!(dbi.configure_args(&BuildContext::new()).unwrap().is_empty());
    }

    #[test]
    fn test_perl_dbi_validates_cleanly() {
        let dbi = PerlDbi::new().unwrap();
        assert!(validate_recipe(&dbi).unwrap().is_empty());
    }
}
