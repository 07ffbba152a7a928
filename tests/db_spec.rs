use orchestrator::db::{Database, DbError};
use orchestrator::install::install;
use orchestrator::manifest::{self, ModuleRegistry};
use orchestrator::models::*;
use speculate2::speculate;

fn registry_from(sources: &[&str]) -> ModuleRegistry {
    let manifests = sources
        .iter()
        .enumerate()
        .map(|(i, s)| manifest::parse(s, format!("manifest-{}", i)).expect("Invalid manifest"))
        .collect::<Vec<_>>();
    ModuleRegistry::new(manifests).expect("Invalid registry")
}

const GAMEPLAN: &str = r#"
name = "orchestrator_gameplan"
title = "Orchestrator Gameplan"
publisher = "Orchestrator Team"
description = "Project management"
version = "0.1.0"
license = "Proprietary"
owned_document_types = ["Project", "Task", "Sprint"]

[asset_includes]
scripts = ["/assets/orchestrator_gameplan/js/gameplan.js", "/assets/orchestrator_gameplan/js/gantt.js", "/assets/orchestrator_gameplan/js/kanban.js"]
styles = ["/assets/orchestrator_gameplan/css/gameplan.css"]

[[fixtures]]
entity_kind = "Custom Role"
filters = { field = "name", predicate = "in", values = ["Project Manager", "Team Lead"] }
"#;

const ORDERED: &str = r#"
name = "ordered"
title = "Ordered"
publisher = "Orchestrator Team"
description = "Asset order"
version = "0.1.0"
license = "Proprietary"

[asset_includes]
scripts = ["b.js", "a.js"]
"#;

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "settings" {
        describe "get_settings" {
            it "returns None when the record does not exist" {
                let result = db.get_settings(WEBSITE_SETTINGS).expect("Query failed");
                assert!(result.is_none());
            }
        }

        describe "ensure_settings" {
            it "creates an empty record" {
                let record = db.ensure_settings(WEBSITE_SETTINGS).expect("Failed to ensure");

                assert_eq!(record.name, WEBSITE_SETTINGS);
                assert!(record.app_name.is_none());
                assert!(!record.hide_footer_signup);
            }

            it "keeps an existing record" {
                let mut record = db.ensure_settings(WEBSITE_SETTINGS).expect("Failed to ensure");
                record.app_name = Some("Existing".to_string());
                db.save_settings(&record).expect("Failed to save");

                let again = db.ensure_settings(WEBSITE_SETTINGS).expect("Failed to ensure");
                assert_eq!(again.app_name.as_deref(), Some("Existing"));
            }
        }

        describe "save_settings" {
            it "persists every branding field" {
                let mut record = db.ensure_settings(WEBSITE_SETTINGS).expect("Failed to ensure");
                BrandingInput::default().apply_to(&mut record);
                db.save_settings(&record).expect("Failed to save");

                let stored = db.get_settings(WEBSITE_SETTINGS).expect("Query failed").unwrap();
                assert_eq!(stored.app_name.as_deref(), Some("Chateau Orchestrator"));
                assert_eq!(stored.brand_html.as_deref(), Some("Chateau Orchestrator"));
                assert!(stored.hide_footer_signup);
            }

            it "fails with NotFound for a missing record" {
                let mut record = db.ensure_settings(WEBSITE_SETTINGS).expect("Failed to ensure");
                record.name = "Other Settings".to_string();

                let err = db.save_settings(&record).unwrap_err();
                assert!(matches!(err, DbError::NotFound { .. }));
            }

            it "fails with Persistence when a constraint rejects the write" {
                let mut record = db.ensure_settings(WEBSITE_SETTINGS).expect("Failed to ensure");
                record.app_name = Some(" ".to_string());

                let err = db.save_settings(&record).unwrap_err();
                assert!(matches!(err, DbError::Persistence(_)));

                let stored = db.get_settings(WEBSITE_SETTINGS).expect("Query failed").unwrap();
                assert!(stored.app_name.is_none());
            }
        }
    }

    describe "modules" {
        describe "register_modules" {
            it "stores manifests with their document types" {
                let registry = registry_from(&[GAMEPLAN]);
                let modules = db.register_modules(&registry).expect("Failed to register");

                assert_eq!(modules.len(), 1);
                assert_eq!(modules[0].manifest.name, "orchestrator_gameplan");
                assert_eq!(
                    db.get_module_doctypes("orchestrator_gameplan").expect("Query failed"),
                    vec!["Project", "Task", "Sprint"]
                );
            }

            it "preserves declared asset order" {
                let registry = registry_from(&[ORDERED]);
                db.register_modules(&registry).expect("Failed to register");

                let assets = db.get_module_assets("ordered").expect("Query failed");
                let paths: Vec<_> = assets.iter().map(|a| a.path.as_str()).collect();
                assert_eq!(paths, vec!["b.js", "a.js"]);
            }

            it "is idempotent and keeps the registration id" {
                let registry = registry_from(&[GAMEPLAN]);
                let first = db.register_modules(&registry).expect("Failed to register");
                let second = db.register_modules(&registry).expect("Failed to register");

                assert_eq!(first[0].registration_id, second[0].registration_id);
                assert_eq!(db.get_module_assets("orchestrator_gameplan").expect("Query failed").len(), 4);
                assert_eq!(db.get_module_doctypes("orchestrator_gameplan").expect("Query failed").len(), 3);
            }

            it "drops modules absent from the new registry" {
                db.register_modules(&registry_from(&[GAMEPLAN, ORDERED])).expect("Failed to register");
                let before = db.get_registered_module("ordered").expect("Query failed").unwrap();

                let modules = db.register_modules(&registry_from(&[ORDERED])).expect("Failed to register");

                assert_eq!(modules.len(), 1);
                assert_eq!(modules[0].manifest.name, "ordered");
                assert_eq!(modules[0].position, 0);
                assert_eq!(modules[0].registration_id, before.registration_id);
                assert!(db.get_registered_module("orchestrator_gameplan").expect("Query failed").is_none());
                assert!(db.get_module_doctypes("orchestrator_gameplan").expect("Query failed").is_empty());

                let assets = db.get_all_assets().expect("Query failed");
                let paths: Vec<_> = assets.iter().map(|a| a.path.as_str()).collect();
                assert_eq!(paths, vec!["b.js", "a.js"]);
            }

            it "lists all assets in module order" {
                let registry = registry_from(&[ORDERED, GAMEPLAN]);
                db.register_modules(&registry).expect("Failed to register");

                let assets = db.get_all_assets().expect("Query failed");
                assert_eq!(assets[0].module, "ordered");
                assert_eq!(assets[1].module, "ordered");
                assert_eq!(assets[2].path, "/assets/orchestrator_gameplan/js/gameplan.js");
                assert_eq!(assets[3].path, "/assets/orchestrator_gameplan/js/gantt.js");
                assert_eq!(assets[4].path, "/assets/orchestrator_gameplan/js/kanban.js");
                assert_eq!(assets[5].kind, AssetKind::Style);
            }
        }

        describe "get_registered_module" {
            it "returns None for an unknown module" {
                let result = db.get_registered_module("orchestrator_unknown").expect("Query failed");
                assert!(result.is_none());
            }
        }
    }

    describe "fixtures" {
        describe "apply_fixture" {
            it "inserts every selected name" {
                let directive = FixtureDirective::names_in("Custom Role", &["HR Manager", "HR Staff", "Employee"]);
                let outcome = db.apply_fixture("orchestrator_hr", &directive).expect("Failed to apply");

                assert_eq!(outcome.inserted, vec!["HR Manager", "HR Staff", "Employee"]);
                assert!(outcome.existing.is_empty());
            }

            it "is idempotent" {
                let directive = FixtureDirective::names_in("Custom Role", &["HR Manager", "HR Staff"]);
                db.apply_fixture("orchestrator_hr", &directive).expect("Failed to apply");
                let once = db.get_fixture_records("Custom Role").expect("Query failed");

                let outcome = db.apply_fixture("orchestrator_hr", &directive).expect("Failed to apply");
                let twice = db.get_fixture_records("Custom Role").expect("Query failed");

                assert!(outcome.inserted.is_empty());
                assert_eq!(outcome.existing, vec!["HR Manager", "HR Staff"]);
                assert_eq!(
                    once.iter().map(|r| &r.name).collect::<Vec<_>>(),
                    twice.iter().map(|r| &r.name).collect::<Vec<_>>()
                );
            }

            it "keeps the module that seeded a record first" {
                db.apply_fixture("orchestrator_hr", &FixtureDirective::names_in("Custom Role", &["Employee"]))
                    .expect("Failed to apply");
                db.apply_fixture("orchestrator_crm", &FixtureDirective::names_in("Custom Role", &["Employee"]))
                    .expect("Failed to apply");

                let records = db.get_fixture_records("Custom Role").expect("Query failed");
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].source_module, "orchestrator_hr");
            }
        }
    }

    describe "install" {
        it "registers the bundled modules and seeds their roles" {
            let registry = manifest::load_registry(None).expect("Invalid bundled manifests");
            let report = install(&db, &registry).expect("Install failed");

            assert_eq!(report.modules.len(), 7);
            assert_eq!(report.existing_count(), 0);
            assert_eq!(report.inserted_count(), 19);
        }

        it "converges when rerun" {
            let registry = manifest::load_registry(None).expect("Invalid bundled manifests");
            install(&db, &registry).expect("Install failed");
            let report = install(&db, &registry).expect("Install failed");

            assert_eq!(report.inserted_count(), 0);
            assert_eq!(report.existing_count(), 19);
            assert_eq!(db.get_fixture_records("Custom Role").expect("Query failed").len(), 19);
        }
    }
}
