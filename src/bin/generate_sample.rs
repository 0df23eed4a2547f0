use chrono::{Days, NaiveDate};

const HEADERS: [&str; 6] = [
    "Numéro de commande",
    "E-mail (Facturation)",
    "Montant total de la commande",
    "Date de commande",
    "Nom de l’élément",
    "Quantité (- Remboursement)",
];

/// (item name, unit price)
const CATALOG: [(&str, f64); 12] = [
    ("Pod X", 24.90),
    ("Pod X Cartouches (x2)", 9.90),
    ("Coil Mesh 0.6", 12.50),
    ("Clearomiseur Zeus", 34.00),
    ("Batterie 18650", 8.90),
    ("E-liquide Acme Mint 10ml", 5.90),
    ("E-liquide Acme Red Fruits 10ml", 5.90),
    ("E-liquide Fuu Pomme 50ml", 19.90),
    ("E-liquide Le-French'Liquide Fraise 10ml", 5.50),
    ("E-liquide Vap3 Classic 10ml", 5.90),
    ("E-liquide Nordic Menthol 10ml", 5.50),
    ("E-liquide 10ml Booster", 1.90),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform in `0..n`.
    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

/// `12.5` → `"12,50"`, the export's decimal comma.
fn french_decimal(v: f64) -> String {
    format!("{v:.2}").replace('.', ",")
}

fn main() -> anyhow::Result<()> {
    let output_path = std::env::args().nth(1).unwrap_or_else(|| "orders.csv".to_string());
    let mut rng = SimpleRng::new(42);

    let customers: Vec<String> = (0..40).map(|i| format!("client{i:02}@example.fr")).collect();
    let first_day = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid start date");

    let mut writer = csv::Writer::from_path(&output_path)?;
    writer.write_record(HEADERS)?;

    let mut lines = 0;
    let n_orders = 300;
    for order_no in 0..n_orders {
        // a few heavy buyers, a long tail of occasional ones
        let customer = if rng.below(3) == 0 {
            &customers[rng.below(5)]
        } else {
            &customers[rng.below(customers.len())]
        };
        let date = first_day + Days::new(rng.below(540) as u64);
        let timestamp = format!("{} {:02}:{:02}:00", date.format("%Y-%m-%d"), rng.below(24), rng.below(60));

        let n_items = 1 + rng.below(4);
        let items: Vec<(&str, f64, u32)> = (0..n_items)
            .map(|_| {
                let (name, price) = CATALOG[rng.below(CATALOG.len())];
                (name, price, 1 + rng.below(3) as u32)
            })
            .collect();
        let total: f64 = items.iter().map(|(_, price, qty)| price * *qty as f64).sum();

        for (name, _, qty) in &items {
            writer.write_record([
                (10_000 + order_no).to_string(),
                customer.clone(),
                french_decimal(total),
                timestamp.clone(),
                name.to_string(),
                qty.to_string(),
            ])?;
            lines += 1;
        }
    }
    writer.flush()?;

    println!("Wrote {n_orders} orders ({lines} lines) to {output_path}");
    Ok(())
}
