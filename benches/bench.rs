// Criterion benchmarks for the SIS API matching core

use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sis_api::core::{check_eligibility, calculate_match_score, SchemeMatcher};
use sis_api::models::{EligibilityCriteria, MatchWeights, Scheme, SchemeType, StudentProfile};

fn create_scheme(id: usize) -> Scheme {
    let min_cgpa = (id % 7) as f64;
    Scheme {
        id: id.to_string(),
        name: format!("Scheme {}", id),
        short_name: None,
        description: format!("Scheme {} description", id),
        scheme_type: SchemeType::Scholarship,
        department: "Education".to_string(),
        ministry: None,
        level: "Central".to_string(),
        eligibility_criteria: EligibilityCriteria {
            min_cgpa,
            max_cgpa: 10.0,
            min_attendance: (id % 4) as f64 * 20.0,
            courses: if id % 3 == 0 {
                vec!["B.Tech CSE".to_string(), "B.Tech ECE".to_string()]
            } else {
                vec![]
            },
            semesters: if id % 5 == 0 { vec![3, 4, 5, 6] } else { vec![] },
            ..Default::default()
        },
        application_start_date: None,
        application_end_date: Some(Utc::now() + Duration::days(30)),
        application_url: None,
        benefits: vec![],
        tags: vec![],
        category: "General".to_string(),
        total_applicants: 0,
        total_beneficiaries: 0,
        is_active: true,
        created_at: None,
        updated_at: None,
    }
}

fn create_student() -> StudentProfile {
    StudentProfile {
        cgpa: 8.0,
        attendance: 90.0,
        course: "B.Tech CSE".to_string(),
        semester: 4,
    }
}

fn bench_check_eligibility(c: &mut Criterion) {
    let criteria = EligibilityCriteria {
        min_cgpa: 6.0,
        max_cgpa: 10.0,
        min_attendance: 75.0,
        courses: vec!["B.Tech CSE".to_string(), "B.Tech ECE".to_string()],
        semesters: vec![3, 4, 5, 6],
        ..Default::default()
    };
    let student = create_student();

    c.bench_function("check_eligibility", |b| {
        b.iter(|| check_eligibility(black_box(&criteria), black_box(&student)));
    });
}

fn bench_match_score(c: &mut Criterion) {
    let criteria = EligibilityCriteria {
        min_cgpa: 6.0,
        max_cgpa: 10.0,
        min_attendance: 75.0,
        ..Default::default()
    };
    let student = create_student();
    let weights = MatchWeights::default();

    c.bench_function("calculate_match_score", |b| {
        b.iter(|| {
            calculate_match_score(black_box(&criteria), black_box(&student), black_box(&weights))
        });
    });
}

fn bench_ranking(c: &mut Criterion) {
    let matcher = SchemeMatcher::with_default_weights();
    let student = create_student();

    let mut group = c.benchmark_group("ranking");

    for scheme_count in [10, 50, 100, 500, 1000].iter() {
        let schemes: Vec<Scheme> = (0..*scheme_count).map(create_scheme).collect();

        group.bench_with_input(
            BenchmarkId::new("rank", scheme_count),
            scheme_count,
            |b, _| {
                b.iter(|| matcher.rank(black_box(&student), black_box(schemes.clone())));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_check_eligibility, bench_match_score, bench_ranking);

criterion_main!(benches);
