//! Synthetic tickets for demo runs.
//!
//! Only used when the operator explicitly asks for sample data; an empty
//! input is never silently replaced with this.

use crate::types::{Status, TicketRecord};
use chrono::{Duration, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::Rng;

pub const SAMPLE_ENGINEERS: [&str; 4] = ["Marco Antonio", "Carlos Pérez", "Ana López", "Luis García"];

pub fn generate_sample_tickets(n: usize, now: NaiveDateTime) -> Vec<TicketRecord> {
    generate_sample_tickets_with(&mut rand::thread_rng(), n, now)
}

pub fn generate_sample_tickets_with<R: Rng>(
    rng: &mut R,
    n: usize,
    now: NaiveDateTime,
) -> Vec<TicketRecord> {
    let base = now - Duration::days(15);
    (0..n)
        .map(|i| TicketRecord {
            ticket_id: i as u64 + 1,
            date: base + Duration::hours(rng.gen_range(1..=300)),
            status: *Status::ALL.choose(&mut *rng).unwrap_or(&Status::Open),
            engineer: SAMPLE_ENGINEERS
                .choose(&mut *rng)
                .unwrap_or(&SAMPLE_ENGINEERS[0])
                .to_string(),
        })
        .collect()
}
