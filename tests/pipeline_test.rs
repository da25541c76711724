use anyhow::Result;
use tempfile::tempdir;

use mart_enrich::app::enrich_use_case::EnrichUseCase;
use mart_enrich::config::Config;
use mart_enrich::infra::enriched_output_adapter::FileEnrichedOutputAdapter;
use mart_enrich::infra::quarantine_output_adapter::CsvQuarantineOutputAdapter;
use mart_enrich::lexicon::feedback::CorrectionRecord;
use mart_enrich::lexicon::LexiconStore;
use mart_enrich::pipeline::ingestion;

const BRANDS_JSON: &str = r#"[
  { "canonical": "wardah", "aliases": ["wardah", "warda"] },
  { "canonical": "scarlett", "aliases": ["scarlett", "scarlet"] }
]"#;

const CATEGORIES_JSON: &str = r#"{
  "categories": [
    { "category": "serum", "keywords": ["serum", "whitening"], "priority": 1 },
    { "category": "body_care", "keywords": ["body", "body lotion"], "priority": 3 }
  ],
  "blocklist": ["sikat gigi"]
}"#;

const RAW_CSV: &str = "\
source,name,url,image,rating,sold_quantity,price_current,price_original,discount
shopee,[BPOM] Wardah Lightening Serum 20ml FLASH SALE!!,https://shopee.co.id/product/1/100?spm=abc,img,4.9,1000,45000,90000,50
shopee,Sikat Gigi Elektrik,https://shopee.co.id/product/1/101,img,4.5,10,15000,15000,0
tokopedia,Scarlett Body Lotion,https://www.tokopedia.com/s/123?tm=abc,img,4.8,500,50000,50000,0
tokopedia,Scarlett Body Lotion,https://www.tokopedia.com/s/123?tm=xyz,img,4.8,510,45000,50000,10
lazada,,https://www.lazada.co.id/products/p9.html,img,0,0,0,0,0
lazada,Produk Aneh Tanpa Merek,https://www.lazada.co.id/products/p10.html,img,4.0,5,10000,10000,0
";

fn test_config(dir: &std::path::Path) -> Result<Config> {
    let brands_path = dir.join("brands.json");
    let categories_path = dir.join("categories.json");
    std::fs::write(&brands_path, BRANDS_JSON)?;
    std::fs::write(&categories_path, CATEGORIES_JSON)?;

    let mut config = Config::default();
    config.lexicons.brands = brands_path.to_str().unwrap().to_string();
    config.lexicons.categories = categories_path.to_str().unwrap().to_string();
    config.sinks.enriched = dir.join("enriched.ndjson").to_str().unwrap().to_string();
    config.sinks.quarantine = dir.join("quarantine.csv").to_str().unwrap().to_string();
    Ok(config)
}

#[tokio::test]
async fn full_batch_routes_confident_and_quarantined_records() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = test_config(temp_dir.path())?;

    let input_path = temp_dir.path().join("raw_listings.csv");
    std::fs::write(&input_path, RAW_CSV)?;

    let store = LexiconStore::load(&config.lexicons)?;
    let batch = ingestion::read_batch(&input_path, &config.identity)?;

    // 6 rows: 1 malformed (empty name), 1 duplicate identity
    assert_eq!(batch.stats.rows_read, 6);
    assert_eq!(batch.stats.malformed, 1);
    assert_eq!(batch.stats.duplicates, 1);
    assert_eq!(batch.stats.accepted, 4);

    let use_case = EnrichUseCase::new(
        &config,
        store,
        Box::new(FileEnrichedOutputAdapter::new(&config.sinks.enriched)?),
        Box::new(CsvQuarantineOutputAdapter::new(&config.sinks.quarantine)?),
    )?;

    let summary = use_case.run_batch(&batch.listings).await?;
    assert_eq!(summary.total, 4);
    assert_eq!(summary.persisted, 2);
    assert_eq!(summary.quarantined, 2);

    // Confident sink: no unknown labels may ever land here
    let enriched_lines: Vec<serde_json::Value> = std::fs::read_to_string(&config.sinks.enriched)?
        .lines()
        .map(serde_json::from_str)
        .collect::<std::result::Result<_, _>>()?;
    assert_eq!(enriched_lines.len(), 2);
    for record in &enriched_lines {
        assert_ne!(record["brand"], "unknown");
        assert_ne!(record["product_type"], "unknown");
    }

    let wardah = enriched_lines
        .iter()
        .find(|r| r["brand"] == "wardah")
        .expect("wardah record persisted");
    assert_eq!(wardah["title_cleaned"], "Wardah Lightening Serum 20Ml");
    assert_eq!(wardah["product_type"], "serum");
    assert_eq!(wardah["brand_confidence"], 0.95);
    assert_eq!(wardah["product_type_confidence"], 0.9);
    assert_eq!(wardah["price_effective"], 45000.0);

    let scarlett = enriched_lines
        .iter()
        .find(|r| r["brand"] == "scarlett")
        .expect("scarlett record persisted");
    assert_eq!(scarlett["product_type"], "body_care");
    assert_eq!(scarlett["product_type_confidence"], 0.75);
    // Dedup kept the first capture
    assert_eq!(scarlett["price_effective"], 50000.0);

    // Quarantine worksheet carries current guesses and empty corrections
    let mut reader = csv::Reader::from_path(&config.sinks.quarantine)?;
    let rows: Vec<CorrectionRecord> = reader
        .deserialize()
        .collect::<Result<_, csv::Error>>()?;
    assert_eq!(rows.len(), 2);

    let toothbrush = rows
        .iter()
        .find(|r| r.title_raw == "Sikat Gigi Elektrik")
        .expect("blocklisted listing quarantined");
    assert_eq!(toothbrush.current_brand, "unknown");
    assert_eq!(toothbrush.current_product_type, "unknown");
    assert!(toothbrush.corrected_brand.is_empty());
    assert!(toothbrush.corrected_product_type.is_empty());
    assert_eq!(toothbrush.content_hash.len(), 64);

    Ok(())
}

#[tokio::test]
async fn tracking_params_do_not_split_identity() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = test_config(temp_dir.path())?;

    let input_path = temp_dir.path().join("raw_listings.csv");
    std::fs::write(
        &input_path,
        "source,name,url,image,rating,sold_quantity,price_current,price_original,discount\n\
         shopee,Wardah Serum,https://shopee.co.id/p/123?spm=abc&tm=123,img,4.9,10,1000,1000,0\n\
         shopee,Wardah Serum,https://shopee.co.id/p/123,img,4.9,12,1100,1100,0\n",
    )?;

    let batch = ingestion::read_batch(&input_path, &config.identity)?;
    assert_eq!(batch.listings.len(), 1);
    assert_eq!(batch.stats.duplicates, 1);

    Ok(())
}

#[test]
fn missing_lexicon_file_aborts_before_processing() {
    let temp_dir = tempdir().unwrap();
    let mut config = Config::default();
    config.lexicons.brands = temp_dir
        .path()
        .join("nope.json")
        .to_str()
        .unwrap()
        .to_string();

    assert!(LexiconStore::load(&config.lexicons).is_err());
}
