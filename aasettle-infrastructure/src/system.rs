use aasettle_application::{BillIdGenerator, Clock};
use aasettle_domain::BillId;
use chrono::{DateTime, Utc};
use uuid::Uuid;

const BILL_ID_LEN: usize = 6;

#[derive(Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Short lowercase hex ids cut from a random UUID.
#[derive(Default)]
pub struct UuidBillIdGenerator;

impl BillIdGenerator for UuidBillIdGenerator {
    fn generate(&self) -> BillId {
        let hex = Uuid::new_v4().simple().to_string();
        BillId::new(&hex[..BILL_ID_LEN])
    }
}
