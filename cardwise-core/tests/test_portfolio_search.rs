use cardwise_core::{
    evaluate_portfolio, find_best_portfolio, prefilter, resolve_rebates, Card, Category,
    EngineError, Rebate, RebateUsage, SearchConfig, SpendingProfile,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

/// A catalog shaped like the converted issuer data: bonus categories under
/// issuer vocabulary, flat credits, a couple of category credits.
fn sample_catalog() -> Vec<Card> {
    vec![
        Card::new("chase", "Sapphire Reserve")
            .with_fee(550.0)
            .with_point_value(0.015)
            .with_reward("flights_portal", 5.0)
            .with_reward("dining", 3.0)
            .with_rebate(Rebate::flat(300.0, "Travel credit"))
            .with_rebate(Rebate::category("dining", 120.0, "DoorDash credit")),
        Card::new("amex", "Gold")
            .with_fee(325.0)
            .with_reward("restaurants", 4.0)
            .with_reward("supermarkets", 4.0)
            .with_reward("flights_portal", 3.0)
            .with_rebate(Rebate::category("dining", 120.0, "Dining credit"))
            .with_rebate(Rebate::flat(100.0, "Uber Cash")),
        Card::new("capital_one", "Venture X")
            .with_fee(395.0)
            .with_reward("flights_portal", 5.0)
            .with_reward("hotels_portal", 10.0)
            .with_reward("other", 2.0)
            .with_rebate(Rebate::flat(300.0, "Portal travel credit")),
        Card::new("citi", "Double Cash").with_reward("all", 2.0),
        Card::new("citi", "Custom Cash").with_reward("top", 5.0),
        Card::new("discover", "It").with_reward("gas", 3.0),
    ]
}

fn monthly_profile() -> SpendingProfile {
    SpendingProfile::from_monthly([
        (Category::Groceries, 500.0),
        (Category::Dining, 400.0),
        (Category::FlightsPortal, 600.0),
        (Category::Hotel, 150.0),
        (Category::Gas, 200.0),
        (Category::OnlineShopping, 300.0),
        (Category::Other, 300.0),
    ])
    .unwrap()
}

#[test]
fn test_dining_card_vs_flat_card_regression() {
    let catalog = vec![
        Card::new("x", "CardA").with_reward("dining", 3.0).with_fee(95.0),
        Card::new("y", "CardB").with_reward("all", 1.0),
    ];
    let spending = SpendingProfile::new([(Category::Dining, 4800.0)]).unwrap();
    let config = SearchConfig { max_portfolio_size: Some(2), ..SearchConfig::default() };

    let out = find_best_portfolio(&catalog, &spending, &RebateUsage::new(), &config).unwrap();

    // A alone: 3 * 4800 * 0.01 - 95 = 49. B alone: 48. {A, B}: dining still
    // goes to A and B adds nothing, so 49 ties and the earlier subset stays.
    assert_eq!(out.portfolio, vec!["CardA".to_string()]);
    assert!(approx(out.evaluation.net_value, 49.0));
    assert!(approx(out.evaluation.total_rewards, 144.0));
    assert_eq!(out.evaluation.total_fees, 95.0);
    assert_eq!(out.portfolios_evaluated, 3);
}

#[test]
fn test_best_value_monotonic_in_spend() {
    let catalog = sample_catalog();
    let cards: Vec<&Card> = catalog.iter().collect();
    for category in Category::ALL {
        let mut last = 0.0;
        for spend in [0.0, 10.0, 250.0, 1000.0, 12_000.0] {
            let spending = SpendingProfile::new([(category, spend)]).unwrap();
            let eval = evaluate_portfolio(&cards, &spending, &RebateUsage::new());
            let value = eval.assignment(category).unwrap().value;
            assert!(value >= last, "{category}: {value} < {last} at spend {spend}");
            last = value;
        }
    }
}

#[test]
fn test_category_rebates_never_exceed_spend() {
    let catalog = sample_catalog();
    for dining in [0.0, 50.0, 119.0, 120.0, 200.0, 240.0, 5000.0] {
        let spending = SpendingProfile::new([(Category::Dining, dining)]).unwrap();
        for n in 1..=catalog.len() {
            let cards: Vec<&Card> = catalog.iter().take(n).collect();
            let res = resolve_rebates(&cards, &spending, &RebateUsage::new());
            for category in Category::ALL {
                let used = res.category_used(&cards, category);
                assert!(
                    used <= spending.get(category) + 1e-9,
                    "{category}: used {used} > spend {}",
                    spending.get(category)
                );
            }
        }
    }
}

#[test]
fn test_toggling_flat_rebate_removes_exactly_its_amount() {
    let catalog = sample_catalog();
    let cards: Vec<&Card> = catalog.iter().take(3).collect();
    let spending = monthly_profile();

    let on = evaluate_portfolio(&cards, &spending, &RebateUsage::new());
    let usage = RebateUsage::new().with_toggle("Gold", 1, false);
    let off = evaluate_portfolio(&cards, &spending, &usage);

    assert!(approx(on.total_rebates - off.total_rebates, 100.0));
    assert!(approx(on.net_value - off.net_value, 100.0));
    assert_eq!(on.total_rewards, off.total_rewards);

    let flat_total: f64 = off
        .ledger
        .values()
        .flatten()
        .filter(|e| !e.is_category && e.applied)
        .map(|e| e.amount)
        .sum();
    assert!(approx(flat_total, 300.0 + 300.0));
}

#[test]
fn test_search_respects_size_and_candidate_limits() {
    let catalog = sample_catalog();
    let spending = monthly_profile();
    let config = SearchConfig {
        max_cards_to_consider: Some(4),
        max_portfolio_size: Some(2),
        ..SearchConfig::default()
    };

    let candidates: Vec<String> = prefilter(&catalog, &spending, &config)
        .iter()
        .map(|c| c.name.clone())
        .collect();
    let out = find_best_portfolio(&catalog, &spending, &RebateUsage::new(), &config).unwrap();

    assert_eq!(candidates.len(), 4);
    assert_eq!(out.candidates_considered, 4);
    assert!(!out.portfolio.is_empty() && out.portfolio.len() <= 2);
    assert!(out.portfolio.iter().all(|name| candidates.contains(name)));
    // 4 singles + 6 pairs
    assert_eq!(out.portfolios_evaluated, 10);
}

#[test]
fn test_unlimited_search_covers_whole_catalog() {
    let catalog: Vec<Card> = sample_catalog().into_iter().take(4).collect();
    let config = SearchConfig {
        max_cards_to_consider: None,
        max_portfolio_size: None,
        ..SearchConfig::default()
    };
    let out = find_best_portfolio(&catalog, &monthly_profile(), &RebateUsage::new(), &config).unwrap();
    assert_eq!(out.candidates_considered, 4);
    assert_eq!(out.portfolios_evaluated, 15);
}

#[test]
fn test_search_result_is_best_of_all_subsets() {
    let catalog: Vec<Card> = sample_catalog();
    let spending = monthly_profile();
    let config = SearchConfig { max_cards_to_consider: None, ..SearchConfig::default() };
    let out = find_best_portfolio(&catalog, &spending, &RebateUsage::new(), &config).unwrap();

    // Brute force over all subsets of size <= 4 by bitmask.
    let mut best = f64::MIN;
    for mask in 1u32..(1 << catalog.len()) {
        if mask.count_ones() > 4 {
            continue;
        }
        let cards: Vec<&Card> = (0..catalog.len())
            .filter(|i| mask & (1 << i) != 0)
            .map(|i| &catalog[i])
            .collect();
        best = best.max(evaluate_portfolio(&cards, &spending, &RebateUsage::new()).net_value);
    }
    assert!(approx(out.evaluation.net_value, best));
}

#[test]
fn test_evaluation_is_idempotent() {
    let catalog = sample_catalog();
    let cards: Vec<&Card> = catalog.iter().collect();
    let spending = monthly_profile();
    let usage = RebateUsage::new().with_toggle("Venture X", 0, false);

    let first = evaluate_portfolio(&cards, &spending, &usage);
    let second = evaluate_portfolio(&cards, &spending, &usage);
    assert_eq!(first, second);

    let config = SearchConfig::default();
    let a = find_best_portfolio(&catalog, &spending, &usage, &config).unwrap();
    let b = find_best_portfolio(&catalog, &spending, &usage, &config).unwrap();
    assert_eq!(a.portfolio, b.portfolio);
    assert_eq!(a.evaluation, b.evaluation);
}

#[test]
fn test_ignoring_rebates_drops_flat_but_keeps_category_rebates() {
    let catalog = vec![
        Card::new("x", "Credits")
            .with_reward("all", 1.0)
            .with_rebate(Rebate::flat(200.0, "Travel credit"))
            .with_rebate(Rebate::category("dining", 100.0, "Dining credit")),
    ];
    let spending = SpendingProfile::new([(Category::Dining, 1000.0)]).unwrap();
    let off = SearchConfig { include_rebates: false, ..SearchConfig::default() };

    let out = find_best_portfolio(&catalog, &spending, &RebateUsage::new(), &off).unwrap();

    assert!(approx(out.evaluation.total_rebates, 100.0));
    let ledger = &out.evaluation.ledger["Credits"];
    let flat = ledger.iter().find(|e| !e.is_category).unwrap();
    assert_eq!((flat.used, flat.applied), (0.0, false));
    let category = ledger.iter().find(|e| e.is_category).unwrap();
    assert_eq!((category.used, category.applied), (100.0, true));

    let on = find_best_portfolio(&catalog, &spending, &RebateUsage::new(), &SearchConfig::default())
        .unwrap();
    assert!(approx(on.evaluation.total_rebates, 300.0));
}

#[test]
fn test_ignoring_rebates_overrides_user_toggles() {
    let catalog = vec![Card::new("x", "A").with_rebate(Rebate::flat(50.0, "credit"))];
    let usage = RebateUsage::new().with_toggle("A", 0, true);
    let off = SearchConfig { include_rebates: false, ..SearchConfig::default() };
    let out = find_best_portfolio(&catalog, &SpendingProfile::default(), &usage, &off).unwrap();
    assert_eq!(out.evaluation.total_rebates, 0.0);
}

#[test]
fn test_search_errors() {
    let spending = monthly_profile();
    let usage = RebateUsage::new();

    let err = find_best_portfolio(&[], &spending, &usage, &SearchConfig::default()).unwrap_err();
    assert_eq!(err, EngineError::EmptyCatalog);

    let catalog = sample_catalog();
    let zero = SearchConfig { max_portfolio_size: Some(0), ..SearchConfig::default() };
    let err = find_best_portfolio(&catalog, &spending, &usage, &zero).unwrap_err();
    assert_eq!(err, EngineError::InvalidPortfolioSize);
}

#[test]
fn test_first_seen_wins_on_equal_portfolios() {
    let catalog = vec![
        Card::new("x", "Twin A").with_reward("all", 2.0),
        Card::new("y", "Twin B").with_reward("all", 2.0),
    ];
    let spending = SpendingProfile::new([(Category::Other, 1000.0)]).unwrap();
    let out = find_best_portfolio(&catalog, &spending, &RebateUsage::new(), &SearchConfig::default())
        .unwrap();
    assert_eq!(out.portfolio, vec!["Twin A".to_string()]);
}
