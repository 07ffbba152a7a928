mod error;
mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use uuid::Uuid;

pub use error::{DbError, DbResult};

use crate::manifest::ModuleRegistry;
use crate::models::*;

/// Handle to one site's store.
///
/// Cloning shares the underlying connection. The connection closes when the
/// last clone is dropped.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open a site store, creating the file and its parent directories if needed.
    pub fn open(path: PathBuf) -> DbResult<Self> {
        let parent = path.parent().ok_or_else(|| DbError::Connection {
            path: path.display().to_string(),
            reason: "path has no parent directory".to_string(),
        })?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path).map_err(|e| DbError::Connection {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::configure(conn, &path)
    }

    /// Connect to an existing site store. Fails with [`DbError::Connection`] if
    /// the site has not been initialised.
    pub fn connect(path: &Path) -> DbResult<Self> {
        if !path.is_file() {
            return Err(DbError::Connection {
                path: path.display().to_string(),
                reason: "site store does not exist (run `orchestrator init`)".to_string(),
            });
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| DbError::Connection {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::configure(conn, path)
    }

    pub fn open_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn configure(conn: Connection, path: &Path) -> DbResult<Self> {
        let connection_err = |e: rusqlite::Error| DbError::Connection {
            path: path.display().to_string(),
            reason: e.to_string(),
        };
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(connection_err)?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(connection_err)?;
        tracing::debug!("Connected to site store {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> DbResult<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn).map_err(DbError::Migration)
    }

    // ============================================================
    // Settings operations
    // ============================================================

    pub fn get_settings(&self, name: &str) -> DbResult<Option<SettingsRecord>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let record = conn
            .query_row(
                "SELECT name, app_name, app_logo, favicon, brand_html, hide_footer_signup, updated_at
                 FROM settings WHERE name = ?",
                [name],
                |row| {
                    Ok(SettingsRecord {
                        name: row.get(0)?,
                        app_name: row.get(1)?,
                        app_logo: row.get(2)?,
                        favicon: row.get(3)?,
                        brand_html: row.get(4)?,
                        hide_footer_signup: row.get::<_, i32>(5)? != 0,
                        updated_at: parse_datetime(row.get::<_, String>(6)?),
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Create the singleton record with empty fields if it does not exist yet.
    pub fn ensure_settings(&self, name: &str) -> DbResult<SettingsRecord> {
        {
            let conn = self.conn.lock().expect("database lock poisoned");
            let created = conn.execute(
                "INSERT OR IGNORE INTO settings (name, updated_at) VALUES (?, ?)",
                (name, Utc::now().to_rfc3339()),
            )?;
            if created > 0 {
                tracing::info!("Created settings record '{}'", name);
            }
        }

        self.get_settings(name)?.ok_or_else(|| DbError::NotFound {
            kind: "Settings record",
            name: name.to_string(),
        })
    }

    /// Persist every field of an existing record in one transaction.
    ///
    /// Returns [`DbError::NotFound`] if the record is gone and
    /// [`DbError::Persistence`] if the store rejects the write. Either way
    /// nothing is written.
    pub fn save_settings(&self, record: &SettingsRecord) -> DbResult<SettingsRecord> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();

        let tx = conn.transaction().map_err(DbError::Persistence)?;
        let rows = tx
            .execute(
                "UPDATE settings
                 SET app_name = ?, app_logo = ?, favicon = ?, brand_html = ?, hide_footer_signup = ?, updated_at = ?
                 WHERE name = ?",
                (
                    &record.app_name,
                    &record.app_logo,
                    &record.favicon,
                    &record.brand_html,
                    if record.hide_footer_signup { 1 } else { 0 },
                    now.to_rfc3339(),
                    &record.name,
                ),
            )
            .map_err(DbError::Persistence)?;

        if rows == 0 {
            return Err(DbError::NotFound {
                kind: "Settings record",
                name: record.name.clone(),
            });
        }

        tx.commit().map_err(DbError::Persistence)?;

        Ok(SettingsRecord {
            updated_at: now,
            ..record.clone()
        })
    }

    // ============================================================
    // Module registration operations
    // ============================================================

    /// Register every module of a registry in one transaction.
    ///
    /// Re-registering a module replaces its assets and document types and keeps
    /// its registration id. Modules absent from `registry` are removed, so the
    /// store always mirrors the last installed set.
    pub fn register_modules(&self, registry: &ModuleRegistry) -> DbResult<Vec<RegisteredModule>> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();

        let tx = conn.transaction().map_err(DbError::Persistence)?;

        let stale: Vec<String> = {
            let mut stmt = tx.prepare("SELECT name FROM modules")?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            names
                .into_iter()
                .filter(|name| registry.get(name).is_none())
                .collect()
        };
        for name in &stale {
            tx.execute("DELETE FROM module_assets WHERE module = ?", [name])
                .map_err(DbError::Persistence)?;
            tx.execute("DELETE FROM module_doctypes WHERE module = ?", [name])
                .map_err(DbError::Persistence)?;
            tx.execute("DELETE FROM modules WHERE name = ?", [name])
                .map_err(DbError::Persistence)?;
            tracing::info!("Unregistered module {}", name);
        }

        for (position, manifest) in registry.iter().enumerate() {
            let manifest_json = serde_json::to_string(manifest)?;

            tx.execute(
                "INSERT INTO modules (name, registration_id, position, title, version, manifest, registered_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(name) DO UPDATE SET
                    position = excluded.position,
                    title = excluded.title,
                    version = excluded.version,
                    manifest = excluded.manifest,
                    registered_at = excluded.registered_at",
                (
                    &manifest.name,
                    Uuid::new_v4().to_string(),
                    position as i64,
                    &manifest.title,
                    &manifest.version,
                    &manifest_json,
                    now.to_rfc3339(),
                ),
            )
            .map_err(DbError::Persistence)?;

            tx.execute("DELETE FROM module_assets WHERE module = ?", [&manifest.name])
                .map_err(DbError::Persistence)?;
            tx.execute("DELETE FROM module_doctypes WHERE module = ?", [&manifest.name])
                .map_err(DbError::Persistence)?;

            let asset_lists = [
                (AssetScope::App, AssetKind::Script, &manifest.asset_includes.scripts),
                (AssetScope::App, AssetKind::Style, &manifest.asset_includes.styles),
                (AssetScope::Web, AssetKind::Script, &manifest.web_includes.scripts),
                (AssetScope::Web, AssetKind::Style, &manifest.web_includes.styles),
            ];
            for (scope, kind, paths) in asset_lists {
                for (i, path) in paths.iter().enumerate() {
                    tx.execute(
                        "INSERT INTO module_assets (module, scope, kind, position, path)
                         VALUES (?, ?, ?, ?, ?)",
                        (&manifest.name, scope.as_str(), kind.as_str(), i as i64, path),
                    )
                    .map_err(DbError::Persistence)?;
                }
            }

            for (i, doctype) in manifest.owned_document_types.iter().enumerate() {
                tx.execute(
                    "INSERT INTO module_doctypes (module, position, doctype) VALUES (?, ?, ?)",
                    (&manifest.name, i as i64, doctype),
                )
                .map_err(DbError::Persistence)?;
            }

            tracing::debug!("Registered module {}", manifest.name);
        }
        tx.commit().map_err(DbError::Persistence)?;
        drop(conn);

        self.get_registered_modules()
    }

    pub fn get_registered_modules(&self) -> DbResult<Vec<RegisteredModule>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT registration_id, position, manifest, registered_at
             FROM modules ORDER BY position, name",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, position, manifest, registered_at)| -> DbResult<RegisteredModule> {
                Ok(RegisteredModule {
                    registration_id: parse_uuid(id),
                    position,
                    manifest: serde_json::from_str(&manifest)?,
                    registered_at: parse_datetime(registered_at),
                })
            })
            .collect()
    }

    pub fn get_registered_module(&self, name: &str) -> DbResult<Option<RegisteredModule>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let row = conn
            .query_row(
                "SELECT registration_id, position, manifest, registered_at
                 FROM modules WHERE name = ?",
                [name],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((id, position, manifest, registered_at)) => Ok(Some(RegisteredModule {
                registration_id: parse_uuid(id),
                position,
                manifest: serde_json::from_str(&manifest)?,
                registered_at: parse_datetime(registered_at),
            })),
            None => Ok(None),
        }
    }

    /// Assets of one module: desk before website, scripts before styles, then load order.
    pub fn get_module_assets(&self, name: &str) -> DbResult<Vec<RegisteredAsset>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT module, scope, kind, position, path
             FROM module_assets WHERE module = ? ORDER BY scope, kind, position",
        )?;

        let assets = stmt
            .query_map([name], row_to_asset)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(assets)
    }

    /// Assets of every module, in module registration order.
    pub fn get_all_assets(&self) -> DbResult<Vec<RegisteredAsset>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT a.module, a.scope, a.kind, a.position, a.path
             FROM module_assets a JOIN modules m ON m.name = a.module
             ORDER BY m.position, a.scope, a.kind, a.position",
        )?;

        let assets = stmt
            .query_map([], row_to_asset)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(assets)
    }

    pub fn get_module_doctypes(&self, name: &str) -> DbResult<Vec<String>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn
            .prepare("SELECT doctype FROM module_doctypes WHERE module = ? ORDER BY position")?;

        let doctypes = stmt
            .query_map([name], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(doctypes)
    }

    // ============================================================
    // Fixture operations
    // ============================================================

    /// Ensure every record selected by a directive exists.
    ///
    /// Idempotent: names already present are reported as existing and left untouched.
    pub fn apply_fixture(
        &self,
        module: &str,
        directive: &FixtureDirective,
    ) -> DbResult<FixtureOutcome> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now().to_rfc3339();

        let mut outcome = FixtureOutcome {
            entity_kind: directive.entity_kind.clone(),
            ..Default::default()
        };

        let tx = conn.transaction().map_err(DbError::Persistence)?;
        for name in &directive.filters.values {
            let inserted = tx
                .execute(
                    "INSERT OR IGNORE INTO fixture_records (entity_kind, name, source_module, created_at)
                     VALUES (?, ?, ?, ?)",
                    (&directive.entity_kind, name, module, &now),
                )
                .map_err(DbError::Persistence)?;

            if inserted > 0 {
                outcome.inserted.push(name.clone());
            } else {
                outcome.existing.push(name.clone());
            }
        }
        tx.commit().map_err(DbError::Persistence)?;

        Ok(outcome)
    }

    /// Seeded records of one kind, in creation order.
    pub fn get_fixture_records(&self, entity_kind: &str) -> DbResult<Vec<FixtureRecord>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT entity_kind, name, source_module, created_at
             FROM fixture_records WHERE entity_kind = ? ORDER BY rowid",
        )?;

        let records = stmt
            .query_map([entity_kind], |row| {
                Ok(FixtureRecord {
                    entity_kind: row.get(0)?,
                    name: row.get(1)?,
                    source_module: row.get(2)?,
                    created_at: parse_datetime(row.get::<_, String>(3)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn row_to_asset(row: &rusqlite::Row<'_>) -> rusqlite::Result<RegisteredAsset> {
    Ok(RegisteredAsset {
        module: row.get(0)?,
        scope: AssetScope::from_str(&row.get::<_, String>(1)?).unwrap_or(AssetScope::App),
        kind: AssetKind::from_str(&row.get::<_, String>(2)?).unwrap_or(AssetKind::Script),
        position: row.get(3)?,
        path: row.get(4)?,
    })
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
