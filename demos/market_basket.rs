use association_rules::Apriori;

const BASKETS: &[&[u32]] = &[&[1, 2, 5], &[2, 3, 4], &[1, 2, 3], &[2, 10]];

fn main() {
    let mut apriori = Apriori::new(1..=9, 0.2, 0.7, 4).unwrap();
    apriori
        .generate_rules(BASKETS.iter().map(|basket| basket.iter().copied()))
        .unwrap();

    println!("frequent itemsets:");
    for cardinality in 1..=4 {
        for (items, support) in apriori.frequent_of_size(cardinality).unwrap() {
            println!("  {items:?}, support {support:.2}");
        }
    }

    println!("predictions:");
    for query in [vec![1], vec![4], vec![2, 3]] {
        for (items, confidence) in apriori.predict(query.clone()).unwrap() {
            println!("  {query:?} -> {items:?} ({confidence:.2})");
        }
    }
}
