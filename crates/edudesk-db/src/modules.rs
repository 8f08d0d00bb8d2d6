use anyhow::Context;
use edudesk_core::permissions::{Module, access_levels, has_module_access};
use edudesk_core::{AccessLevel, Role};
use sqlx::PgPool;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub modules: usize,
    pub role_modules: usize,
    pub removed: u64,
}

/// Upserts the module catalogue and the role grants from the static table,
/// then deletes rows the table no longer names. Runs in one transaction.
pub async fn sync_modules(pool: &PgPool) -> anyhow::Result<SyncReport> {
    let mut tx = pool.begin().await.context("Failed to start module sync")?;
    let mut report = SyncReport::default();

    for (index, module) in Module::ALL.iter().enumerate() {
        sqlx::query(
            r#"INSERT INTO modules (key, name, description, sort_order)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (key) DO UPDATE
               SET name = EXCLUDED.name,
                   description = EXCLUDED.description,
                   sort_order = EXCLUDED.sort_order,
                   updated_at = NOW()"#,
        )
        .bind(module.key())
        .bind(module.name())
        .bind(module.description())
        .bind(index as i32)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to upsert module {}", module.key()))?;
        report.modules += 1;
    }

    let keys: Vec<&str> = Module::ALL.iter().map(Module::key).collect();
    report.removed += sqlx::query("DELETE FROM modules WHERE NOT (key = ANY($1))")
        .bind(&keys)
        .execute(&mut *tx)
        .await
        .context("Failed to remove stale modules")?
        .rows_affected();

    for role in Role::ALL {
        let granted: Vec<&str> = Module::ALL
            .iter()
            .filter(|module| has_module_access(role, **module))
            .map(Module::key)
            .collect();

        for module in Module::ALL {
            let levels = access_levels(role, module);
            if levels.is_empty() {
                continue;
            }
            sqlx::query(
                r#"INSERT INTO role_modules (role, module_key, can_read, can_write, can_admin)
                   VALUES ($1, $2, $3, $4, $5)
                   ON CONFLICT (role, module_key) DO UPDATE
                   SET can_read = EXCLUDED.can_read,
                       can_write = EXCLUDED.can_write,
                       can_admin = EXCLUDED.can_admin,
                       updated_at = NOW()"#,
            )
            .bind(role)
            .bind(module.key())
            .bind(levels.contains(&AccessLevel::Read))
            .bind(levels.contains(&AccessLevel::Write))
            .bind(levels.contains(&AccessLevel::Admin))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to upsert {} grant for {}", module.key(), role))?;
            report.role_modules += 1;
        }

        report.removed +=
            sqlx::query("DELETE FROM role_modules WHERE role = $1 AND NOT (module_key = ANY($2))")
                .bind(role)
                .bind(&granted)
                .execute(&mut *tx)
                .await
                .context("Failed to remove stale role grants")?
                .rows_affected();
    }

    tx.commit().await.context("Failed to commit module sync")?;

    tracing::info!(
        modules = report.modules,
        role_modules = report.role_modules,
        removed = report.removed,
        "Module catalogue synchronised"
    );
    Ok(report)
}
