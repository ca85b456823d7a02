use evonn_nn::io;
use evonn_nn::math::sigmoid;
use evonn_nn::mutation::{MutationConfig, MutationWeights};
use evonn_nn::networks::{Network, NetworkIdAllocator};

use rand::{rngs::StdRng, Rng, SeedableRng};

fn weights(network: &Network) -> Vec<(usize, f64)> {
    network
        .link_ids()
        .into_iter()
        .map(|id| (id, network.link(id).unwrap().weight()))
        .collect()
}

#[test]
fn zeroed_two_input_network_outputs_half() {
    let mut network = Network::minimal(0, 2, 1, &mut rand::thread_rng());
    for id in network.link_ids() {
        network.set_link_weight(id, 0.0).unwrap();
    }
    let bias_link = network
        .links()
        .find(|l| l.source() == network.bias())
        .map(|l| l.id())
        .unwrap();
    network.set_link_weight(bias_link, 0.0).unwrap();

    assert_eq!(network.compute_activation(&[0.0, 0.0]).unwrap(), vec![sigmoid(0.0)]);
    assert_eq!(network.compute_activation(&[0.0, 0.0]).unwrap(), vec![0.5]);
}

#[test]
fn evolved_copies_stay_independent() {
    let mut rng = StdRng::seed_from_u64(1234);
    let ids = NetworkIdAllocator::new();
    let config = MutationConfig::default();
    let choices = MutationWeights::default();

    let mut original = Network::minimal(ids.next_id(), 4, 3, &mut rng);
    for _ in 0..30 {
        let mutation = choices.choose(&mut rng).unwrap();
        original.mutate(mutation, &config, &mut rng).unwrap();
    }
    let snapshot = weights(&original);
    let text = io::to_text(&original);

    let mut copy = original.deep_copy(&ids);
    assert_ne!(copy.id(), original.id());
    assert!(copy.verify_connectivity().is_ok());
    assert_eq!(weights(&copy), snapshot);

    for _ in 0..30 {
        let mutation = choices.choose(&mut rng).unwrap();
        copy.mutate(mutation, &config, &mut rng).unwrap();
        copy.verify_connectivity().unwrap();
    }
    copy.randomize_weights(&mut rng);

    assert_eq!(weights(&original), snapshot);
    assert_eq!(io::to_text(&original), text);
    assert!(original.verify_connectivity().is_ok());
}

#[test]
fn recurrent_networks_never_loop_forever() {
    let mut rng = StdRng::seed_from_u64(77);
    let config = MutationConfig::default();
    let mut network = Network::minimal(0, 2, 2, &mut rng);
    for _ in 0..5 {
        network.mutate_new_node(&mut rng).unwrap();
    }
    while network.mutate_new_link(&config, &mut rng).unwrap().is_some() {}
    assert!(network.verify_connectivity().is_ok());

    let inputs: Vec<[f64; 2]> = (0..20).map(|_| [rng.gen(), rng.gen()]).collect();
    for input in &inputs {
        let output = network.compute_activation(input).unwrap();
        assert!(output.iter().all(|o| (0.0..=1.0).contains(o)));
    }
}

#[test]
fn loaded_networks_keep_growing() {
    let mut rng = StdRng::seed_from_u64(5);
    let config = MutationConfig::default();
    let mut network = Network::minimal(0, 3, 1, &mut rng);
    network.mutate_new_node(&mut rng).unwrap();
    network.mutate_new_node(&mut rng).unwrap();

    let mut loaded = io::parse_network(&network.to_string()).unwrap();
    let node = loaded.mutate_new_node(&mut rng).unwrap().unwrap();
    assert!(network.node(node).is_err());
    assert!(loaded.mutate_new_link(&config, &mut rng).unwrap().is_some());
    assert!(loaded.verify_connectivity().is_ok());
}
