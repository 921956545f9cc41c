use data_loader::SessionData;
use std::path::Path;
use std::time::Instant;

fn main() {
    let train_path = Path::new("data/sessions_train.csv");
    let test_path = Path::new("data/sessions_test_task1.csv");

    println!("Loading session files...\n");

    let start = Instant::now();
    let data = SessionData::load_from_files(train_path, test_path)
        .expect("Failed to load sessions");
    let elapsed = start.elapsed();

    let (train, test) = data.counts();
    let items: usize = data.train_sessions().iter().map(|s| s.items.len()).sum::<usize>()
        + data.test_sessions().iter().map(|s| s.items.len()).sum::<usize>();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Training sessions: {}", train);
    println!("Test sessions: {}", test);
    println!("Item tokens: {}", items);
    println!("\nPerformance: {:.0} sessions/second",
             (train + test) as f64 / elapsed.as_secs_f64());
}
