//! ServiceAccount collision handling
//!
//! The agent stack renders two ServiceAccounts from the same logical name:
//! one for the agent itself and one for the workers it spawns. Once the
//! generated suffixes are stripped both would be called `workflow-agent`.
//! The account labelled as the primary workload keeps the base name, the
//! other one is given the fallback name.

use std::collections::{BTreeMap, BTreeSet};

use helmgen_core::{DocumentSet, NormalizeOptions};

use crate::rename::RenameMap;
use crate::warning::{CollisionReason, NormalizeWarning};

const SERVICE_ACCOUNT: &str = "ServiceAccount";

#[derive(Debug)]
struct Account {
    original: String,
    marked: bool,
    primary: bool,
}

/// Rewrite `renames` so that no two ServiceAccounts end up with the same name
///
/// Collisions that cannot be resolved unambiguously fall back to the
/// original names of the accounts involved and are reported as warnings.
pub fn disambiguate_service_accounts(
    documents: &DocumentSet,
    renames: &mut RenameMap,
    options: &NormalizeOptions,
) -> Vec<NormalizeWarning> {
    let mut groups: BTreeMap<String, Vec<Account>> = BTreeMap::new();
    let mut seen = BTreeSet::new();
    let mut taken = BTreeSet::new();

    for doc in documents.iter().filter(|d| d.is_kind(SERVICE_ACCOUNT)) {
        let Some(name) = doc.name() else {
            continue;
        };
        // the same account rendered twice is not a collision
        if !seen.insert(name.to_string()) {
            continue;
        }

        let resolved = renames.resolve(name).to_string();
        taken.insert(name.to_string());
        taken.insert(resolved.clone());

        groups.entry(resolved).or_default().push(Account {
            original: name.to_string(),
            marked: renames.contains(name),
            primary: doc.has_label(&options.primary_label),
        });
    }

    let mut warnings = Vec::new();

    for (base, accounts) in groups.iter().filter(|(_, accounts)| accounts.len() > 1) {
        if let Some(reason) = unresolvable(accounts) {
            for account in accounts {
                renames.remove(&account.original);
            }
            tracing::debug!("unresolved ServiceAccount collision on {}", base);
            warnings.push(NormalizeWarning::UnresolvedCollision {
                base: base.clone(),
                kept: accounts.iter().map(|a| a.original.clone()).collect(),
                reason,
            });
            continue;
        }

        let mut others = accounts.iter().filter(|a| !a.primary);
        let mut kept = Vec::new();
        let mut reason = CollisionReason::TooManyAccounts;

        if let Some(worker) = others.next() {
            let fallback = &options.fallback_service_account;
            if taken.contains(fallback) {
                renames.remove(&worker.original);
                kept.push(worker.original.clone());
                reason = CollisionReason::FallbackTaken(fallback.clone());
            } else {
                tracing::debug!("rename {} -> {} (collision)", worker.original, fallback);
                renames.insert(worker.original.clone(), fallback.clone());
                taken.insert(fallback.clone());
            }
        }

        for extra in others {
            renames.remove(&extra.original);
            kept.push(extra.original.clone());
        }

        if !kept.is_empty() {
            warnings.push(NormalizeWarning::UnresolvedCollision {
                base: base.clone(),
                kept,
                reason,
            });
        }
    }

    warnings
}

fn unresolvable(accounts: &[Account]) -> Option<CollisionReason> {
    match accounts.iter().filter(|a| a.primary).count() {
        0 => return Some(CollisionReason::NoPrimary),
        1 => {}
        _ => return Some(CollisionReason::MultiplePrimaries),
    }

    accounts
        .iter()
        .find(|a| !a.primary && !a.marked)
        .map(|a| CollisionReason::UnmarkedMember(a.original.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use helmgen_core::Document;

    fn account(name: &str, primary: bool) -> Document {
        let labels = if primary {
            "  labels:\n    app.kubernetes.io/name: customer-managed-workflow-agent\n"
        } else {
            ""
        };
        Document::from_yaml(&format!(
            "apiVersion: v1\nkind: ServiceAccount\nmetadata:\n  name: {}\n  annotations:\n    pulumi.com/autonamed: \"true\"\n{}",
            name, labels
        ))
        .unwrap()
        .unwrap()
    }

    fn run(docs: Vec<Document>) -> (RenameMap, Vec<NormalizeWarning>) {
        let set: DocumentSet = docs.into_iter().collect();
        let options = NormalizeOptions::default();
        let mut renames = RenameMap::build(&set, &options);
        let warnings = disambiguate_service_accounts(&set, &mut renames, &options);
        (renames, warnings)
    }

    #[test]
    fn test_primary_keeps_base_and_worker_gets_fallback() {
        let (renames, warnings) = run(vec![
            account("workflow-agent-aaaa1111", true),
            account("workflow-agent-bbbb2222", false),
        ]);

        assert!(warnings.is_empty());
        assert_eq!(renames.get("workflow-agent-aaaa1111"), Some("workflow-agent"));
        assert_eq!(
            renames.get("workflow-agent-bbbb2222"),
            Some("worker-service-account")
        );
    }

    #[test]
    fn test_primary_position_does_not_matter() {
        let (renames, _) = run(vec![
            account("workflow-agent-bbbb2222", false),
            account("workflow-agent-aaaa1111", true),
        ]);

        assert_eq!(renames.get("workflow-agent-aaaa1111"), Some("workflow-agent"));
        assert_eq!(
            renames.get("workflow-agent-bbbb2222"),
            Some("worker-service-account")
        );
    }

    #[test]
    fn test_no_primary_keeps_original_names() {
        let (renames, warnings) = run(vec![
            account("workflow-agent-aaaa1111", false),
            account("workflow-agent-bbbb2222", false),
        ]);

        assert!(renames.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            NormalizeWarning::UnresolvedCollision {
                reason: CollisionReason::NoPrimary,
                ..
            }
        ));
    }

    #[test]
    fn test_multiple_primaries_keep_original_names() {
        let (renames, warnings) = run(vec![
            account("workflow-agent-aaaa1111", true),
            account("workflow-agent-bbbb2222", true),
        ]);

        assert!(renames.is_empty());
        assert!(matches!(
            &warnings[0],
            NormalizeWarning::UnresolvedCollision {
                reason: CollisionReason::MultiplePrimaries,
                ..
            }
        ));
    }

    #[test]
    fn test_third_account_keeps_original_name() {
        let (renames, warnings) = run(vec![
            account("workflow-agent-aaaa1111", true),
            account("workflow-agent-bbbb2222", false),
            account("workflow-agent-cccc3333", false),
        ]);

        assert_eq!(renames.get("workflow-agent-aaaa1111"), Some("workflow-agent"));
        assert_eq!(
            renames.get("workflow-agent-bbbb2222"),
            Some("worker-service-account")
        );
        assert!(!renames.contains("workflow-agent-cccc3333"));
        assert_eq!(
            warnings,
            vec![NormalizeWarning::UnresolvedCollision {
                base: "workflow-agent".to_string(),
                kept: vec!["workflow-agent-cccc3333".to_string()],
                reason: CollisionReason::TooManyAccounts,
            }]
        );
    }

    #[test]
    fn test_fallback_already_taken() {
        let mut existing = account("worker-service-account", false);
        existing.metadata_mut().unwrap().shift_remove("annotations");

        let (renames, warnings) = run(vec![
            existing,
            account("workflow-agent-aaaa1111", true),
            account("workflow-agent-bbbb2222", false),
        ]);

        assert_eq!(renames.get("workflow-agent-aaaa1111"), Some("workflow-agent"));
        assert!(!renames.contains("workflow-agent-bbbb2222"));
        assert!(matches!(
            &warnings[0],
            NormalizeWarning::UnresolvedCollision {
                reason: CollisionReason::FallbackTaken(_),
                ..
            }
        ));
    }

    #[test]
    fn test_unmarked_member_keeps_original_names() {
        let mut plain = account("workflow-agent", false);
        plain.metadata_mut().unwrap().shift_remove("annotations");

        let (renames, warnings) = run(vec![account("workflow-agent-aaaa1111", true), plain]);

        assert!(renames.is_empty());
        assert_eq!(
            warnings,
            vec![NormalizeWarning::UnresolvedCollision {
                base: "workflow-agent".to_string(),
                kept: vec![
                    "workflow-agent-aaaa1111".to_string(),
                    "workflow-agent".to_string(),
                ],
                reason: CollisionReason::UnmarkedMember("workflow-agent".to_string()),
            }]
        );
    }

    #[test]
    fn test_fallback_assigned_once_across_groups() {
        let (renames, warnings) = run(vec![
            account("agent-aaaa1111", true),
            account("agent-bbbb2222", false),
            account("workflow-agent-cccc3333", true),
            account("workflow-agent-dddd4444", false),
        ]);

        assert_eq!(renames.get("agent-bbbb2222"), Some("worker-service-account"));
        assert_eq!(renames.get("workflow-agent-cccc3333"), Some("workflow-agent"));
        assert!(!renames.contains("workflow-agent-dddd4444"));
        assert_eq!(
            warnings,
            vec![NormalizeWarning::UnresolvedCollision {
                base: "workflow-agent".to_string(),
                kept: vec!["workflow-agent-dddd4444".to_string()],
                reason: CollisionReason::FallbackTaken("worker-service-account".to_string()),
            }]
        );
    }

    #[test]
    fn test_distinct_names_are_untouched() {
        let (renames, warnings) = run(vec![
            account("workflow-agent-aaaa1111", true),
            account("other-agent-bbbb2222", false),
        ]);

        assert!(warnings.is_empty());
        assert_eq!(renames.get("other-agent-bbbb2222"), Some("other-agent"));
    }
}
