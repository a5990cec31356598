use super::*;

fn economy_with(money: u64) -> Economy {
    let mut e = Economy::new(&EconomyTuning::default());
    e.money = money;
    e
}

#[test]
fn starts_at_level_one_with_base_costs() {
    let e = Economy::new(&EconomyTuning::default());
    assert_eq!(e.money, 0);
    for u in Upgrade::ALL {
        assert_eq!(e.level(u), 1);
    }
    assert_eq!(e.cost_of(Upgrade::Dozer), Some(100));
    assert_eq!(e.cost_of(Upgrade::Plow), Some(100));
    assert_eq!(e.cost_of(Upgrade::Collector), Some(150));
    assert_eq!(e.cost_of(Upgrade::Area), Some(500));
}

#[test]
fn purchase_debits_levels_up_and_escalates() {
    let mut e = economy_with(1000);

    assert_eq!(e.purchase(Upgrade::Dozer), Purchase::Purchased { level: 2, cost: 100 });
    assert_eq!(e.money, 900);
    assert_eq!(e.level(Upgrade::Dozer), 2);
    assert_eq!(e.cost_of(Upgrade::Dozer), Some(150));

    assert_eq!(e.purchase(Upgrade::Dozer), Purchase::Purchased { level: 3, cost: 150 });
    assert_eq!(e.cost_of(Upgrade::Dozer), Some(225));

    // Other upgrades are untouched.
    assert_eq!(e.cost_of(Upgrade::Plow), Some(100));
}

#[test]
fn escalation_floors_fractional_prices() {
    let mut e = economy_with(10_000);
    e.purchase(Upgrade::Collector); // 150 -> 225
    e.purchase(Upgrade::Collector); // 225 -> 337
    assert_eq!(e.cost_of(Upgrade::Collector), Some(337));
}

#[test]
fn unaffordable_purchase_changes_nothing() {
    let mut e = economy_with(99);
    assert_eq!(e.purchase(Upgrade::Plow), Purchase::Unaffordable { cost: 100 });
    assert_eq!(e.money, 99);
    assert_eq!(e.level(Upgrade::Plow), 1);
    assert_eq!(e.cost_of(Upgrade::Plow), Some(100));
}

#[test]
fn area_follows_its_table_then_maxes_out() {
    let mut e = economy_with(10_000);
    assert_eq!(e.purchase(Upgrade::Area), Purchase::Purchased { level: 2, cost: 500 });
    assert_eq!(e.cost_of(Upgrade::Area), Some(2000));
    assert_eq!(e.purchase(Upgrade::Area), Purchase::Purchased { level: 3, cost: 2000 });
    assert_eq!(e.cost_of(Upgrade::Area), None);

    let money = e.money;
    assert_eq!(e.purchase(Upgrade::Area), Purchase::Maxed);
    assert_eq!(e.money, money);
    assert_eq!(e.level(Upgrade::Area), 3);
}

#[test]
fn max_level_caps_regular_upgrades() {
    let rules = EconomyTuning { max_level: Some(2), starting_money: 10_000, ..default() };
    let mut e = Economy::new(&rules);
    assert!(matches!(e.purchase(Upgrade::Plow), Purchase::Purchased { level: 2, .. }));
    assert_eq!(e.cost_of(Upgrade::Plow), None);
    assert_eq!(e.purchase(Upgrade::Plow), Purchase::Maxed);
}

#[test]
fn zone_bonus_fires_once_at_half() {
    let mut e = economy_with(0);
    let zone = ZoneId(2);
    e.register_gems(zone, 4);

    assert_eq!(e.record_gem(zone), None);
    assert_eq!(e.record_gem(zone), Some(1000));
    assert_eq!(e.money, 1000);
    assert!(e.zone(zone).bonus_awarded);

    assert_eq!(e.record_gem(zone), None);
    assert_eq!(e.record_gem(zone), None);
    assert_eq!(e.money, 1000);
    assert_eq!(e.zone(zone).collected, 4);
}

#[test]
fn zones_are_independent() {
    let mut e = economy_with(0);
    e.register_gems(ZoneId(1), 2);
    e.register_gems(ZoneId(3), 10);

    assert_eq!(e.record_gem(ZoneId(1)), Some(500));
    assert_eq!(e.record_gem(ZoneId(3)), None);
    assert_eq!(e.zone(ZoneId(3)).collected, 1);
    assert_eq!(e.zone(ZoneId(2)), ZoneProgress::default());
}

#[test]
fn unregistered_zone_never_pays_a_bonus() {
    let mut e = economy_with(0);
    assert_eq!(e.record_gem(ZoneId(1)), None);
    assert_eq!(e.money, 0);
}

#[test]
fn plugin_inserts_economy_from_tunables() {
    let mut app = App::new();
    let mut t = Tunables::default();
    t.economy.starting_money = 42;
    app.insert_resource(t);
    plugin(&mut app);
    assert_eq!(app.world().resource::<Economy>().money, 42);
}
