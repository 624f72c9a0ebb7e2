#![allow(missing_docs)]

use ndarray::{Array1, array};
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand::rngs::StdRng;
use roadsim::simulation::error::ConfigError;
use roadsim::simulation::network::{Level, NeuronalNetwork};

fn seeded_network(layers: &[usize], seed: u64) -> NeuronalNetwork {
    NeuronalNetwork::new_using(layers, &mut StdRng::seed_from_u64(seed)).unwrap()
}

fn all_values(network: &NeuronalNetwork) -> Vec<f64> {
    network
        .levels
        .iter()
        .flat_map(|level| level.biases.iter().chain(level.weights.iter()).copied())
        .collect()
}

#[test]
fn hand_built_network_thresholds_each_level() {
    // Output 0 fires when input 0 beats input 1, output 1 fires on their sum.
    let first = Level::from_parts(array![[1.0, 1.0], [-1.0, 1.0]], array![0.0, 0.5]).unwrap();
    // Final output fires only when both hidden neurons fired.
    let second = Level::from_parts(array![[1.0], [1.0]], array![1.5]).unwrap();
    let mut network = NeuronalNetwork::from_levels(vec![first, second]).unwrap();

    assert_eq!(network.feed_forward(&[1.0, 0.0]), array![1.0]);
    assert_eq!(network.feed_forward(&[0.0, 1.0]), array![0.0]);
    assert_eq!(network.feed_forward(&[0.2, 0.2]), array![0.0]);
    assert_eq!(network.levels[0].outputs, array![0.0, 0.0]);
}

#[test]
fn feed_forward_is_deterministic_and_binary() {
    let mut a = seeded_network(&[5, 6, 4], 11);
    let mut b = a.clone();
    let inputs = [0.1, 0.9, 0.0, 0.5, 1.0];

    let outputs = a.feed_forward(&inputs);
    assert_eq!(outputs, b.feed_forward(&inputs));
    assert_eq!(outputs.len(), 4);
    assert!(outputs.iter().all(|&value| value == 0.0 || value == 1.0));
}

#[test]
fn missing_inputs_keep_their_previous_values() {
    let mut network = seeded_network(&[3, 2], 3);
    network.feed_forward(&[0.25, 0.5, 0.75]);
    network.feed_forward(&[1.0]);
    assert_eq!(network.levels[0].inputs, array![1.0, 0.5, 0.75]);

    // Extra inputs are ignored.
    network.feed_forward(&[0.0, 0.0, 0.0, 9.0]);
    assert_eq!(network.levels[0].inputs, Array1::<f64>::zeros(3));
}

#[test]
fn mutate_zero_is_a_no_op() {
    let mut network = seeded_network(&[5, 6, 4], 5);
    let before = network.clone();
    network.mutate_using(0.0, &mut StdRng::seed_from_u64(99));
    assert_eq!(network, before);
}

#[test]
fn mutate_one_replaces_every_value() {
    let mut network = seeded_network(&[5, 6, 4], 5);
    let before = all_values(&network);
    network.mutate_using(1.0, &mut StdRng::seed_from_u64(99));
    let after = all_values(&network);

    assert!(after.iter().all(|value| (-1.0..=1.0).contains(value)));
    let unchanged = before.iter().zip(&after).filter(|(a, b)| a == b).count();
    assert_eq!(unchanged, 0);
}

#[test]
fn full_mutation_forgets_the_previous_weights() {
    let mut a = seeded_network(&[5, 6, 4], 1);
    let mut b = seeded_network(&[5, 6, 4], 2);
    assert_ne!(a, b);

    a.mutate_using(1.0, &mut StdRng::seed_from_u64(77));
    b.mutate_using(1.0, &mut StdRng::seed_from_u64(77));
    assert_eq!(all_values(&a), all_values(&b));
}

#[test]
fn mutation_amount_is_clamped() {
    let mut clamped = seeded_network(&[4, 3], 8);
    let mut full = clamped.clone();
    clamped.mutate_using(7.0, &mut StdRng::seed_from_u64(1));
    full.mutate_using(1.0, &mut StdRng::seed_from_u64(1));
    assert_eq!(clamped, full);
}

#[test]
fn partial_mutation_stays_between_old_and_fresh_values() {
    let mut network = seeded_network(&[4, 3], 21);
    network.mutate_using(0.3, &mut StdRng::seed_from_u64(2));
    assert!(all_values(&network).iter().all(|value| (-1.0..=1.0).contains(value)));
}

#[test]
fn rejects_degenerate_topologies() {
    assert!(matches!(
        NeuronalNetwork::new(&[4]),
        Err(ConfigError::InvalidTopology(_))
    ));
    assert!(matches!(
        NeuronalNetwork::new(&[4, 0, 2]),
        Err(ConfigError::InvalidTopology(_))
    ));

    let a = Level::from_parts(array![[1.0, 1.0]], array![0.0, 0.0]).unwrap();
    let b = Level::from_parts(array![[1.0], [1.0], [1.0]], array![0.0]).unwrap();
    assert!(NeuronalNetwork::from_levels(vec![a, b]).is_err());
    assert!(Level::from_parts(array![[1.0, 1.0]], array![0.0]).is_err());
}

#[test]
fn save_and_load_preserve_the_network() {
    let dir = std::env::temp_dir().join(format!("roadsim-network-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("brain.json");

    let network = seeded_network(&[5, 6, 4], 42);
    network.save_to_file(&path).unwrap();
    let loaded = NeuronalNetwork::load_from_file(&path).unwrap();
    assert_eq!(loaded.levels.len(), network.levels.len());
    for (a, b) in all_values(&loaded).iter().zip(&all_values(&network)) {
        assert!((a - b).abs() < 1e-12);
    }

    std::fs::write(&path, "{ \"levels\": [] }").unwrap();
    assert!(matches!(
        NeuronalNetwork::load_from_file(&path),
        Err(ConfigError::InvalidTopology(_))
    ));

    std::fs::remove_dir_all(&dir).unwrap();
}
