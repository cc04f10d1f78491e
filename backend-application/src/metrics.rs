use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    checkins: AtomicU64,
    checkouts: AtomicU64,
    late_exits: AtomicU64,
    kajli_entries: AtomicU64,
    adjustments: AtomicU64,
    store_errors: AtomicU64,
}

impl Metrics {
    pub fn record_checkin(&self) {
        self.checkins.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_checkout(&self, late: bool) {
        self.checkouts.fetch_add(1, Ordering::Relaxed);
        if late {
            self.late_exits.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_kajli_entry(&self) {
        self.kajli_entries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_adjustment(&self) {
        self.adjustments.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_store_error(&self) {
        self.store_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let checkins = self.checkins.load(Ordering::Relaxed);
        let checkouts = self.checkouts.load(Ordering::Relaxed);
        let late_exits = self.late_exits.load(Ordering::Relaxed);
        let kajli_entries = self.kajli_entries.load(Ordering::Relaxed);
        let adjustments = self.adjustments.load(Ordering::Relaxed);
        let store_errors = self.store_errors.load(Ordering::Relaxed);

        format!(
            "# TYPE yardgate_checkins_total counter\n\
yardgate_checkins_total {}\n\
# TYPE yardgate_checkouts_total counter\n\
yardgate_checkouts_total {}\n\
# TYPE yardgate_late_exits_total counter\n\
yardgate_late_exits_total {}\n\
# TYPE yardgate_kajli_entries_total counter\n\
yardgate_kajli_entries_total {}\n\
# TYPE yardgate_adjustments_total counter\n\
yardgate_adjustments_total {}\n\
# TYPE yardgate_store_errors_total counter\n\
yardgate_store_errors_total {}\n",
            checkins, checkouts, late_exits, kajli_entries, adjustments, store_errors
        )
    }
}
