use carry_rnn::{decode, train, AdditionExample, RecurrentNetwork};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> carry_rnn::Result<()> {
    let mut rng = StdRng::seed_from_u64(0);
    let mut network = RecurrentNetwork::initialize(2, 16, 1, &mut rng)?;

    let iterations = 20_000;
    for i in 0..iterations {
        let example = AdditionExample::sample(&mut rng, 8)?;
        let outcome = train(&mut network, &example.inputs, &example.target, 8, 0.1)?;
        if i % 1000 == 0 {
            println!(
                "Iteration {i}: error = {:.4}  {} + {} = {}",
                outcome.total_error[0],
                example.a,
                example.b,
                decode(&outcome.guess)
            );
        }
    }

    for (a, b) in [(3, 5), (64, 63), (100, 27)] {
        let example = AdditionExample::new(a, b, 8)?;
        let guess = network.predict(&example.inputs, 8)?;
        println!("{a} + {b} -> {guess} ({})", decode(&guess));
    }
    Ok(())
}
