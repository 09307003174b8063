use pineapple::cards::*;
use pineapple::evaluation::*;
use pineapple::hands::*;
use pineapple::mccfr::*;
use pineapple::players::*;

criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        evaluating_five_card_line,
        scoring_complete_boards,
        enumerating_street_one_actions,
        encoding_decision_state,
        choosing_rule_based_action,
        simulating_monte_carlo_action,
        training_final_street,
}

fn board() -> Hand {
    Hand::from_lines(
        Card::parse("Qc Qd 2h").unwrap(),
        Card::parse("7c 7d Kh Ks 2d").unwrap(),
        Card::parse("9c 9d 9h 2s 3h").unwrap(),
    )
}

fn street(n: usize) -> GameStateInfo {
    GameStateInfo::deal(Deck::seeded(0).draw(n), 1, false)
}

fn evaluating_five_card_line(c: &mut criterion::Criterion) {
    let cards = Card::parse("Ts Js Qs Ks As").unwrap();
    c.bench_function("evaluate a 5-card line", |b| {
        b.iter(|| Evaluator::evaluate_line(&cards))
    });
}

fn scoring_complete_boards(c: &mut criterion::Criterion) {
    let a = board();
    let b = Hand::from_lines(
        Card::parse("4c 5d 6h").unwrap(),
        Card::parse("8c 8d Jh Js 3d").unwrap(),
        Card::parse("Tc Td Th 3s 4h").unwrap(),
    );
    c.bench_function("score two complete boards", |x| {
        x.iter(|| Scorer::calculate_hand_score(&a, &b))
    });
}

fn enumerating_street_one_actions(c: &mut criterion::Criterion) {
    let state = street(5);
    c.bench_function("enumerate street-one placements", |b| {
        b.iter(|| ActionSpace::get_valid_actions(&state))
    });
}

fn encoding_decision_state(c: &mut criterion::Criterion) {
    let state = street(5);
    c.bench_function("encode a decision state", |b| b.iter(|| state.encode()));
}

fn choosing_rule_based_action(c: &mut criterion::Criterion) {
    let state = street(5);
    c.bench_function("choose a rule-based placement", |b| {
        b.iter(|| RuleBased.get_action(&state))
    });
}

fn simulating_monte_carlo_action(c: &mut criterion::Criterion) {
    let state = street(3);
    let search = MonteCarlo::new(10);
    c.bench_function("choose a Monte Carlo placement (10 playouts)", |b| {
        b.iter(|| search.get_action(&state))
    });
}

fn training_final_street(c: &mut criterion::Criterion) {
    let mut hand = Hand::from_lines(
        Card::parse("Qc Qd").unwrap(),
        Card::parse("7c 7d Kh Ks").unwrap(),
        Card::parse("9c 9d 9h 2s").unwrap(),
    );
    hand.add_cards(Card::parse("2h 3c 4d").unwrap());
    let state = GameStateInfo::new(hand, Vec::new(), Vec::new(), 5, false);
    let config = AgentConfig {
        hidden: 16,
        ..AgentConfig::default()
    };
    let mut agent = Agent::new("bench", config).unwrap();
    c.bench_function("train one final-street decision", |b| {
        b.iter(|| agent.train(&state))
    });
}
