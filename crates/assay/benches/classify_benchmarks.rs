//! Classification and profiling performance benchmarks.
//!
//! Measures per-value classification throughput and end-to-end column
//! profiling over realistic CRM-shaped data.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use assay::{classify, Assay, Table};

/// Generate realistic CRM contact data.
fn generate_crm_data(rows: usize) -> Table {
    let domains = ["acme.com", "globex.io", "initech.co.uk", "hooli.net"];
    let companies = ["Acme Corp", "Globex", "Initech", "Hooli"];

    let mut emails = Vec::with_capacity(rows);
    let mut phones = Vec::with_capacity(rows);
    let mut dates = Vec::with_capacity(rows);
    let mut sizes = Vec::with_capacity(rows);
    let mut names = Vec::with_capacity(rows);

    for row in 0..rows {
        emails.push(format!("user{}@{}", row, domains[row % domains.len()]));
        // mixed phone formats
        phones.push(match row % 3 {
            0 => format!("555-{:03}-{:04}", row % 1000, row % 10000),
            1 => format!("(555) {:03}-{:04}", row % 1000, row % 10000),
            _ => format!("+1 555 {:03} {:04}", row % 1000, row % 10000),
        });
        // mixed date formats
        dates.push(match row % 2 {
            0 => format!("2023-{:02}-{:02}", (row % 12) + 1, (row % 28) + 1),
            _ => format!("{:02}/{:02}/2023", (row % 12) + 1, (row % 28) + 1),
        });
        // sparse numeric column
        sizes.push(if row % 4 == 0 {
            String::new()
        } else {
            format!("{}", 10 + row % 5000)
        });
        names.push(companies[row % companies.len()].to_string());
    }

    Table::from_columns(vec![
        ("email", emails),
        ("phone", phones),
        ("signup_date", dates),
        ("company_size", sizes),
        ("company", names),
    ])
}

fn bench_classify_single_values(c: &mut Criterion) {
    let values = [
        ("email", "first.last@example.com"),
        ("url", "https://www.example.com/about"),
        ("phone", "+1 (555) 123-4567"),
        ("date", "2024-01-05"),
        ("integer", "1,234,567"),
        ("float", "3.14159"),
        ("text", "just some free text"),
    ];

    let mut group = c.benchmark_group("classify_value");
    for (label, value) in values {
        group.bench_with_input(BenchmarkId::from_parameter(label), value, |b, v| {
            b.iter(|| classify(black_box(v)));
        });
    }
    group.finish();
}

fn bench_profile_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("profile_table");

    for rows in [100, 1_000, 10_000] {
        let table = generate_crm_data(rows);
        let assay = Assay::new();

        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &table, |b, t| {
            b.iter(|| assay.profile_table(black_box(t)));
        });
    }
    group.finish();
}

fn bench_quality_report(c: &mut Criterion) {
    let table = generate_crm_data(1_000);
    let assay = Assay::new();

    c.bench_function("quality_report_1k", |b| {
        b.iter(|| assay.quality_report(black_box(&table)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_classify_single_values,
    bench_profile_table,
    bench_quality_report
);
criterion_main!(benches);
