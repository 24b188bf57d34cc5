use franchise_insights::dataset::loader::{self, PNL_FILE, STORE_FILE};
use franchise_insights::store_lookup::StoreMatcher;
use franchise_insights::{EngineConfig, Insight, InsightError, Intent, QueryEngine};
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

fn write_csv(path: &Path, mut df: DataFrame) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = fs::File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    Ok(())
}

/// Write the five franchise tables into a fresh temp directory.
fn create_test_data_files() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir().join(format!("franchise_it_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir)?;

    write_csv(
        &dir.join("store_metadata.csv"),
        df! [
            "Store_ID" => ["S001", "S002", "S003"],
            "Store_Name" => ["Downtown", "Airport", "Mall"],
            "Brand" => ["Burger Barn", "Burger Barn", "Burger Barn"]
        ]?,
    )?;

    write_csv(
        &dir.join("monthly_pnl_data.csv"),
        df! [
            "Store_ID" => ["S001", "S001", "S002", "S003"],
            "Brand" => ["Burger Barn", "Burger Barn", "Burger Barn", "Burger Barn"],
            "Month" => ["2024-02-01", "2024-03-01", "2024-03-01", "2024-03-01"],
            "Net_Sales" => [11000.0, 12000.0, 18000.0, 15000.0],
            "Food_Cost_%" => [29.0, 34.0, 28.5, 30.0],
            "Labor_Cost_%" => [27.0, 31.5, 25.0, 28.0],
            "Avg_Check" => [11.5, 12.0, 13.5, 12.5],
            "Transactions" => [956i64, 1000, 1333, 1200]
        ]?,
    )?;

    write_csv(
        &dir.join("weekly_purchase_data.csv"),
        df! [
            "Store_ID" => ["S001", "S001", "S001", "S001", "S001", "S001", "S002"],
            "Week" => ["2024-02-05", "2024-02-12", "2024-02-19", "2024-02-26", "2024-03-04", "2024-03-04", "2024-03-04"],
            "Item" => ["Chicken", "Beef Patty", "Cheese", "Fries", "Cheese", "Beef Patty", "Buns"],
            "Variance" => [100.0, 12.0, 20.0, 30.0, 11.0, 15.0, 4.0]
        ]?,
    )?;

    write_csv(
        &dir.join("monthly_menu_mix.csv"),
        df! [
            "Store_ID" => ["S001", "S001", "S001", "S002", "S002"],
            "Brand" => ["Burger Barn", "Burger Barn", "Burger Barn", "Burger Barn", "Burger Barn"],
            "Month" => ["2024-03-01", "2024-03-01", "2024-03-01", "2024-03-01", "2024-03-01"],
            "Menu_Category" => ["Burgers", "Sides", "Beverages", "Burgers", "Beverages"],
            "Sales" => [8000.0, 2500.0, 1500.0, 12000.0, 6000.0]
        ]?,
    )?;

    write_csv(
        &dir.join("monthly_daypart_sales.csv"),
        df! [
            "Store_ID" => ["S001", "S003"],
            "Month" => ["2024-03-01", "2024-03-01"],
            "Breakfast_Sales" => [1000.0, 1500.0],
            "Lunch_Sales" => [3000.0, 5000.0],
            "Dinner_Sales" => [2500.0, 4000.0],
            "Late_Night_Sales" => [200.0, 500.0]
        ]?,
    )?;

    Ok(dir)
}

fn load_engine(dir: &Path) -> QueryEngine {
    let dataset = loader::load_dir(dir).expect("dataset should load");
    QueryEngine::new(dataset, EngineConfig::default())
}

#[test]
fn test_end_to_end_answers() -> Result<(), Box<dyn std::error::Error>> {
    let dir = create_test_data_files()?;
    let engine = load_engine(&dir);

    let summary = engine.dataset().summary();
    assert_eq!(summary.stores, 3);
    assert_eq!(summary.financials, 4);

    let food = engine.answer("Why is my food cost up?", "S001");
    assert!(food.contains("March 2024"), "{}", food);
    assert!(food.contains("4.0 pts above the brand benchmark of 30.0%"), "{}", food);

    let compare = engine.answer("Compare my sales to other stores", "S001");
    assert!(compare.contains("$12,000"), "{}", compare);
    assert!(compare.contains("$15,000"), "{}", compare);

    let scenario = engine.answer("What if I increase my average check?", "S001");
    assert!(scenario.contains("$1,000"), "{}", scenario);
    assert!(scenario.contains("$400"), "{}", scenario);

    let check = engine.answer("What is my average check?", "S001");
    assert!(check.contains("$12.00"), "{}", check);
    assert!(check.contains("1,000 transactions"), "{}", check);

    let beverages = engine.answer("How is my beverage mix?", "S001");
    assert!(beverages.contains("12.5%"), "{}", beverages);

    let staffing = engine.answer("Is my labor too high?", "S002");
    assert!(staffing.contains("within benchmark"), "{}", staffing);

    fs::remove_dir_all(&dir).ok();
    Ok(())
}

#[test]
fn test_purchase_variance_window() -> Result<(), Box<dyn std::error::Error>> {
    let dir = create_test_data_files()?;
    let engine = load_engine(&dir);

    let answer = engine.try_answer("Any overordering lately?", "S001")?;
    assert_eq!(answer.intent, Intent::PurchaseVariance);
    match answer.insight {
        Some(Insight::PurchaseVariance(p)) => {
            assert_eq!(p.weeks.len(), 4);
            let items: Vec<(&str, f64)> = p
                .items
                .iter()
                .map(|i| (i.item.as_str(), i.total_variance))
                .collect();
            // Chicken falls outside the last four weeks
            assert_eq!(items, vec![("Cheese", 31.0), ("Fries", 30.0), ("Beef Patty", 27.0)]);
        }
        other => panic!("unexpected insight: {:?}", other),
    }

    let clean = engine.answer("purchase variance check", "S002");
    assert!(clean.contains("No major overordering"), "{}", clean);

    fs::remove_dir_all(&dir).ok();
    Ok(())
}

#[test]
fn test_missing_data_and_fallback() -> Result<(), Box<dyn std::error::Error>> {
    let dir = create_test_data_files()?;
    let engine = load_engine(&dir);

    let daypart = engine.answer("How was lunch?", "S002");
    assert!(daypart.contains("not available"), "{}", daypart);

    let unknown = engine.answer("Tell me a joke", "S001");
    assert!(unknown.starts_with("I'm still learning"), "{}", unknown);

    let json = serde_json::to_value(engine.try_answer("total sales", "S003")?)?;
    assert_eq!(json["intent"], "TotalSales");
    assert_eq!(json["insight"]["kind"], "total_sales");

    fs::remove_dir_all(&dir).ok();
    Ok(())
}

#[test]
fn test_store_lookup_against_loaded_data() -> Result<(), Box<dyn std::error::Error>> {
    let dir = create_test_data_files()?;
    let engine = load_engine(&dir);
    let matcher = StoreMatcher::default();

    assert_eq!(matcher.resolve(engine.dataset(), "mall")?.store_id, "S003");
    assert_eq!(matcher.resolve(engine.dataset(), "s002")?.store_name, "Airport");

    fs::remove_dir_all(&dir).ok();
    Ok(())
}

#[test]
fn test_invalid_tables_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = create_test_data_files()?;

    // P&L row for a store that is not in the store table
    write_csv(
        &dir.join(PNL_FILE),
        df! [
            "Store_ID" => ["S001", "S404"],
            "Brand" => ["Burger Barn", "Burger Barn"],
            "Month" => ["2024-03-01", "2024-03-01"],
            "Net_Sales" => [12000.0, 9000.0],
            "Food_Cost_%" => [34.0, 30.0],
            "Labor_Cost_%" => [31.5, 28.0],
            "Avg_Check" => [12.0, 10.0],
            "Transactions" => [1000i64, 900]
        ]?,
    )?;
    assert!(matches!(loader::load_dir(&dir), Err(InsightError::InvalidDataset(_))));

    fs::remove_file(dir.join(STORE_FILE))?;
    assert!(matches!(loader::load_dir(&dir), Err(InsightError::Load(_))));

    fs::remove_dir_all(&dir).ok();
    Ok(())
}
