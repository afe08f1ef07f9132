use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use image::{ ImageFormat, RgbaImage };
use sea_orm::{ DatabaseConnection, TransactionTrait };

use crate::config::Config;
use crate::db::TableStore;
use crate::error::Result;
use crate::render::{ load_logo_or_none, QrRenderer, QrStyle };

/// Batch orchestrator: walks the configured index range, ensures each table's
/// row and token, renders the QR artifact, and persists the derived URL and
/// path. All database writes for a run share one transaction.
pub struct Generator {
    config: Config,
    renderer: QrRenderer,
    store: TableStore,
}

impl Generator {
    pub fn new(config: Config) -> Self {
        let renderer = QrRenderer::new(QrStyle::from_config(&config));
        let store = TableStore::new(config.token_length);
        Self { config, renderer, store }
    }

    pub async fn run(&self, db: &DatabaseConnection) -> Result<()> {
        fs::create_dir_all(&self.config.output_dir)?;

        let logo = load_logo_or_none(self.config.logo_path.as_deref());

        let txn = db.begin().await?;

        // PNGs are encoded in memory during the loop and written only after
        // the commit, so a failed batch leaves neither rows nor files.
        let mut pending: Vec<(PathBuf, Vec<u8>)> = Vec::new();

        let start = self.config.start_index;
        for i in start..start + self.config.count {
            let name = table_label(i);

            let (id, token) = self.store.ensure(&txn, self.config.restaurant_id, &name).await?;
            let url = build_access_url(&self.config.base_url, self.config.restaurant_id, &token);

            let img = self.renderer.render(&url, logo.as_ref())?;
            let path = self.config.output_dir.join(format!("{}.png", name));

            self.store.save_artifact(&txn, id, &url, &path.to_string_lossy()).await?;

            tracing::info!("{}: token={}  ->  {}", name, token, url);
            pending.push((path, encode_png(&img)?));
        }

        txn.commit().await?;

        for (path, bytes) in pending {
            fs::write(&path, bytes)?;
            tracing::info!("saved: {}", path.display());
        }

        Ok(())
    }
}

/// Zero-padded table label, also the artifact filename stem.
pub fn table_label(index: u32) -> String {
    format!("table{:02}", index)
}

/// Build the access URL a printed code encodes.
///
/// Single-tenant bases carry their own query prefix (e.g. `.../?token=`) and
/// get the raw token appended. Multi-tenant bases are stripped of trailing
/// `&`/`?`, then joined with `?` (or `&` when the base already has a query
/// string) to the encoded `restaurant_id`/`token` pair.
pub fn build_access_url(base_url: &str, restaurant_id: Option<i32>, token: &str) -> String {
    match restaurant_id {
        None => format!("{}{}", base_url, token),
        Some(rid) => {
            let base = base_url.trim_end_matches(['&', '?']);
            let joiner = if base.contains('?') { '&' } else { '?' };
            format!("{}{}restaurant_id={}&token={}", base, joiner, rid, urlencoding::encode(token))
        }
    }
}

fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::restaurant_table;
    use crate::error::AppError;
    use sea_orm::{ DatabaseBackend, DbErr, MockDatabase };

    #[test]
    fn test_table_label_zero_padding() {
        assert_eq!(table_label(1), "table01");
        assert_eq!(table_label(20), "table20");
        assert_eq!(table_label(100), "table100");
    }

    #[test]
    fn test_single_tenant_url_appends_raw_token() {
        let url = build_access_url("https://selfserv-web.onrender.com/?token=", None, "abc123");
        assert_eq!(url, "https://selfserv-web.onrender.com/?token=abc123");
    }

    #[test]
    fn test_multi_tenant_url_construction() {
        let url = build_access_url("https://x/", Some(2), "abc123");
        assert_eq!(url, "https://x/?restaurant_id=2&token=abc123");
    }

    #[test]
    fn test_multi_tenant_url_no_double_separator() {
        assert_eq!(
            build_access_url("https://x/?", Some(2), "abc123"),
            "https://x/?restaurant_id=2&token=abc123"
        );
        assert_eq!(
            build_access_url("https://x/?lang=en&", Some(2), "abc123"),
            "https://x/?lang=en&restaurant_id=2&token=abc123"
        );
    }

    fn test_config(output_dir: std::path::PathBuf, count: u32) -> Config {
        Config {
            base_url: "https://x/?token=".to_string(),
            output_dir,
            logo_path: None,
            start_index: 1,
            count,
            restaurant_id: None,
            token_length: 16,
            box_size: 4,
            border: 4,
            logo_scale: 0.2,
            pad: crate::config::PadConfig {
                enabled: true,
                ratio: 1.15,
                alpha: 255,
                rounded: true,
            },
            database_url: "postgres://unused".to_string(),
        }
    }

    fn row(id: i32, name: &str, token: Option<&str>) -> restaurant_table::Model {
        restaurant_table::Model {
            id,
            restaurant_id: None,
            name: name.to_string(),
            token: token.map(str::to_string),
            url: None,
            qr_code_path: None,
        }
    }

    #[tokio::test]
    async fn test_run_writes_artifacts_after_commit() {
        let dir = tempfile::tempdir().unwrap();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![row(1, "table01", Some("abc123abc123abc1"))],
                vec![row(1, "table01", Some("abc123abc123abc1"))],
            ])
            .into_connection();

        let generator = Generator::new(test_config(dir.path().to_path_buf(), 1));
        generator.run(&db).await.unwrap();

        let png = std::fs::read(dir.path().join("table01.png")).unwrap();
        assert_eq!(&png[..4], b"\x89PNG");
    }

    #[tokio::test]
    async fn test_failed_batch_writes_no_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        // First table succeeds, second table's lookup fails mid-batch
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![row(1, "table01", Some("abc123abc123abc1"))],
                vec![row(1, "table01", Some("abc123abc123abc1"))],
            ])
            .append_query_errors([DbErr::Custom("connection lost".to_string())])
            .into_connection();

        let generator = Generator::new(test_config(dir.path().to_path_buf(), 2));
        let result = generator.run(&db).await;
        assert!(matches!(result, Err(AppError::Database(_))));

        // No PNG escaped the failed run
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
