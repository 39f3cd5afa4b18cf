use chrono::{DateTime, Local, NaiveDate, Utc};

/// Source of "now" for the repository and the facade.
///
/// The valuation functions take their evaluation date as an argument; only
/// the callers that default it to "today" consult a clock.
pub trait Clock {
    /// Current instant, used for `createdAt` / `lastModified` stamps.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day in the user's local timezone.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock time of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock frozen at a given instant and calendar day. Used by tests and
/// by replays of exported data.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>, today: NaiveDate) -> Self {
        Self { now, today }
    }

    /// A clock at midnight UTC of `today`.
    pub fn at_date(today: NaiveDate) -> Self {
        let now = today.and_time(chrono::NaiveTime::MIN).and_utc();
        Self { now, today }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
