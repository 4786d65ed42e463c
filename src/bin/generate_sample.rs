use std::error::Error;

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

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const HEADER: [&str; 16] = [
    "id", "age", "sex", "dataset", "cp", "trestbps", "chol", "fbs", "restecg", "thalch",
    "exang", "oldpeak", "slope", "ca", "thal", "num",
];

const CHEST_PAIN: [&str; 4] = [
    "asymptomatic",
    "non-anginal",
    "atypical angina",
    "typical angina",
];
const SITES: [&str; 4] = ["Cleveland", "Hungary", "Switzerland", "VA Long Beach"];
const RESTECG: [&str; 3] = ["normal", "lv hypertrophy", "st-t abnormality"];
const SLOPE: [&str; 3] = ["flat", "upsloping", "downsloping"];
const THAL: [&str; 3] = ["normal", "reversable defect", "fixed defect"];

fn main() -> Result<(), Box<dyn Error>> {
    let mut rng = SimpleRng::new(42);
    let output_path = "cleaned_dataset.csv";
    let n_rows = 920;

    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(HEADER)?;

    for id in 1..=n_rows {
        let male = rng.chance(0.79);
        let age = rng.gauss(53.5, 9.4).round().clamp(28.0, 77.0);
        let disease = (rng.next_u64() % 5) as i64;
        let risk = disease as f64;

        let trestbps = rng.gauss(131.0 + 0.3 * (age - 53.5), 17.0).round().clamp(80.0, 200.0);
        let chol = rng.gauss(240.0 + 0.8 * (age - 53.5), 50.0).round().clamp(100.0, 560.0);
        let thalch = rng
            .gauss(175.0 - 0.9 * age - 6.0 * risk, 18.0)
            .round()
            .clamp(60.0, 202.0);
        let oldpeak = (rng.gauss(0.6 + 0.35 * risk, 0.9).max(0.0) * 10.0).round() / 10.0;
        let cp = if disease > 0 && rng.chance(0.6) {
            CHEST_PAIN[0]
        } else {
            rng.pick(&CHEST_PAIN)
        };

        writer.write_record([
            id.to_string(),
            age.to_string(),
            if male { "Male" } else { "Female" }.to_string(),
            rng.pick(&SITES).to_string(),
            cp.to_string(),
            trestbps.to_string(),
            chol.to_string(),
            if rng.chance(0.15) { "True" } else { "False" }.to_string(),
            rng.pick(&RESTECG).to_string(),
            thalch.to_string(),
            if rng.chance(0.1 + 0.15 * risk) { "True" } else { "False" }.to_string(),
            format!("{oldpeak:.1}"),
            rng.pick(&SLOPE).to_string(),
            (rng.next_u64() % 4).to_string(),
            rng.pick(&THAL).to_string(),
            disease.to_string(),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {n_rows} patient records to {output_path}");
    Ok(())
}
