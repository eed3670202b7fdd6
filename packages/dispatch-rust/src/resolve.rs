//! Signature resolution: (type, operation name, argument type names) to
//! exactly one invocable operation.
//!
//! The exact key covers the overwhelming majority of in-process, statically
//! typed calls in O(1). Keys computed from wire-decoded or cross-binding
//! calls legitimately miss when arguments arrive boxed, widened, or as a
//! supertype; those fall to the ordinal index, where candidates are tried
//! in a stable order so the same inputs always produce the same result.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ResolveError;
use crate::index::{MethodRegistry, OperationSignature};
use crate::key::{box_param, exact_key, ordinal_key};

impl MethodRegistry {
    /// Resolve an operation by name and argument type names.
    ///
    /// # Errors
    ///
    /// `ResolveError` when the type has no index, the ordinal key has no
    /// candidates, or no candidate's declared parameters are assignable
    /// from the supplied argument types.
    pub fn resolve(
        &self,
        type_name: &str,
        method: &str,
        arg_type_names: &[&str],
    ) -> Result<Arc<OperationSignature>, ResolveError> {
        let Some(index) = self.index_of(type_name) else {
            warn!(type_name, "type has no signature index");
            return Err(ResolveError::UnknownType {
                type_name: type_name.to_string(),
            });
        };

        // Keys match on the boxed basis; a name that fails boxing cannot
        // match anything and falls through the search naturally.
        let boxed: Vec<&str> = arg_type_names
            .iter()
            .map(|n| box_param(n).unwrap_or(n))
            .collect();

        let key = exact_key(type_name, method, &boxed);
        if let Some(sig) = index.exact(&key) {
            return Ok(sig);
        }

        let okey = ordinal_key(type_name, method, boxed.len());
        let candidates = index.candidates(&okey);
        match candidates {
            [] => Err(ResolveError::NoSuchOperation { key: okey }),
            // A lone ordinal candidate is accepted without a parameter
            // check; arity-unique names resolve on count alone.
            [only] => {
                debug!(key, resolved = %only.exact_key(), "single ordinal candidate");
                index.cache_exact(key, only.clone());
                Ok(only.clone())
            }
            several => {
                for candidate in several {
                    let assignable = {
                        let graph = self.graph();
                        candidate
                            .param_types
                            .iter()
                            .zip(&boxed)
                            .all(|(declared, arg)| graph.is_assignable(declared, arg))
                    };
                    if assignable {
                        debug!(key, resolved = %candidate.exact_key(), "ordinal match");
                        index.cache_exact(key, candidate.clone());
                        return Ok(candidate.clone());
                    }
                }
                let attempted = several.iter().map(|c| c.exact_key()).collect();
                Err(ResolveError::NoAssignableCandidate {
                    key: okey,
                    attempted,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::lamp_registry;

    #[test]
    fn exact_roundtrip_for_every_indexed_operation() {
        let registry = lamp_registry();
        let index = registry.index_of("Lamp").unwrap();
        for key in [
            "Lamp.on()",
            "Lamp.on(Integer)",
            "Lamp.setColor(String)",
            "Lamp.setColor(Color)",
            "Lamp.describe()",
        ] {
            let sig = index.exact(key).unwrap();
            let params: Vec<&str> = sig.param_types.iter().map(String::as_str).collect();
            let resolved = registry.resolve("Lamp", &sig.name, &params).unwrap();
            assert_eq!(resolved.exact_key(), key);
        }
    }

    #[test]
    fn overloads_resolve_by_arity() {
        let registry = lamp_registry();
        let zero = registry.resolve("Lamp", "on", &[]).unwrap();
        assert_eq!(zero.arity(), 0);
        let one = registry.resolve("Lamp", "on", &["Integer"]).unwrap();
        assert_eq!(one.exact_key(), "Lamp.on(Integer)");
    }

    #[test]
    fn primitive_argument_names_match_boxed_signatures() {
        let registry = lamp_registry();
        let sig = registry.resolve("Lamp", "on", &["i32"]).unwrap();
        assert_eq!(sig.exact_key(), "Lamp.on(Integer)");
    }

    #[test]
    fn single_candidate_is_accepted_without_a_parameter_check() {
        let registry = lamp_registry();
        // `Bogus` is assignable to nothing, but `follow` is arity-unique.
        let sig = registry.resolve("Lamp", "follow", &["Bogus"]).unwrap();
        assert_eq!(sig.exact_key(), "Lamp.follow(ColorSource)");
        // The permissive match is cached under the exact key it was asked for.
        let index = registry.index_of("Lamp").unwrap();
        assert!(index.exact("Lamp.follow(Bogus)").is_some());
    }

    #[test]
    fn assignability_picks_among_tied_candidates() {
        let registry = lamp_registry();
        let sig = registry.resolve("Lamp", "setColor", &["RgbColor"]).unwrap();
        assert_eq!(sig.exact_key(), "Lamp.setColor(Color)");
        // Deterministic on repeat, and now an O(1) exact hit.
        let again = registry.resolve("Lamp", "setColor", &["RgbColor"]).unwrap();
        assert_eq!(again.exact_key(), "Lamp.setColor(Color)");
        let index = registry.index_of("Lamp").unwrap();
        assert!(index.exact("Lamp.setColor(RgbColor)").is_some());
    }

    #[test]
    fn no_assignable_candidate_lists_the_attempts() {
        let registry = lamp_registry();
        let err = registry
            .resolve("Lamp", "setColor", &["Integer"])
            .unwrap_err();
        match err {
            ResolveError::NoAssignableCandidate { attempted, .. } => {
                assert_eq!(attempted.len(), 2);
                assert!(attempted.contains(&"Lamp.setColor(String)".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_method_and_type_are_not_found() {
        let registry = lamp_registry();
        assert!(matches!(
            registry.resolve("Lamp", "warp", &[]),
            Err(ResolveError::NoSuchOperation { .. })
        ));
        assert!(matches!(
            registry.resolve("Teapot", "on", &[]),
            Err(ResolveError::UnknownType { .. })
        ));
    }
}
