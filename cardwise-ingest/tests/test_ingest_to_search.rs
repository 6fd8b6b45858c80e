use cardwise_core::{find_best_portfolio, Category, RebateUsage, SearchConfig, SpendingProfile};
use cardwise_ingest::{
    annualized_spending, convert_catalog, convert_catalog_file, load_catalog, parse_statement_csv,
    validate_catalog,
};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_convert_raw_catalog_fixture() {
    let raw = std::fs::read_to_string(fixture("raw_catalog.txt")).unwrap();
    let cards = convert_catalog(&raw).unwrap();
    validate_catalog(&cards).unwrap();

    assert_eq!(cards.len(), 5);

    let sapphire = cards.iter().find(|c| c.name == "Sapphire Reserve").unwrap();
    assert_eq!(sapphire.annual_fee, 550.0);
    assert_eq!(sapphire.rewards.get("dining"), Some(&3.0));
    // 60k points is not a statement credit
    assert_eq!(sapphire.rebates.len(), 1);

    let double = cards.iter().find(|c| c.name == "Double Cash").unwrap();
    assert_eq!(double.rebates.len(), 1);
    assert_eq!(double.rebates[0].description(), "Signup/Offer");

    let savor = cards.iter().find(|c| c.name == "SavorOne").unwrap();
    assert_eq!(savor.rewards.get("other"), Some(&1.0));
}

#[test]
fn test_converted_file_loads_back() {
    let out = std::env::temp_dir().join(format!("cardwise-converted-{}.json", std::process::id()));
    let n = convert_catalog_file(fixture("raw_catalog.txt"), &out).unwrap();
    let cards = load_catalog(&out).unwrap();
    std::fs::remove_file(&out).ok();
    assert_eq!(n, cards.len());
}

#[test]
fn test_statement_fixture() {
    let txns = parse_statement_csv(fixture("statement.csv")).unwrap();
    assert_eq!(txns.len(), 11);
    assert!(txns.iter().any(|t| t.amount < 0.0));

    let spend = annualized_spending(&txns);
    // 01/03 .. 02/04 inclusive
    let scale = 365.0 / 33.0;
    assert!((spend[&Category::Groceries] - 278.50 * scale).abs() < 1e-6);
    assert!((spend[&Category::Dining] - 79.05 * scale).abs() < 1e-6);
    assert!((spend[&Category::Gas] - 58.12 * scale).abs() < 1e-6);
    assert!((spend[&Category::FlightsPortal] - 412.0 * scale).abs() < 1e-6);
    assert!((spend[&Category::Hotel] - 219.0 * scale).abs() < 1e-6);
    assert!((spend[&Category::Other] - 5.33 * scale).abs() < 1e-6);
}

#[test]
fn test_end_to_end_search_from_files() {
    let raw = std::fs::read_to_string(fixture("raw_catalog.txt")).unwrap();
    let cards = convert_catalog(&raw).unwrap();
    let txns = parse_statement_csv(fixture("statement.csv")).unwrap();
    let spending = SpendingProfile::new(annualized_spending(&txns)).unwrap();

    let out = find_best_portfolio(&cards, &spending, &RebateUsage::new(), &SearchConfig::default())
        .unwrap();

    assert!(!out.portfolio.is_empty());
    assert!(out.portfolio.len() <= 4);
    let e = &out.evaluation;
    assert!((e.net_value - (e.total_rewards + e.total_rebates - e.total_fees)).abs() < 1e-9);
    // Every card in the winning portfolio has a ledger entry.
    for name in &out.portfolio {
        assert!(e.ledger.contains_key(name), "{name} missing from ledger");
    }
}
