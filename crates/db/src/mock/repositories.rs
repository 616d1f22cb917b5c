use async_trait::async_trait;
use barbershop_core::{
    errors::BookingResult,
    models::{
        appointment::{Appointment, AppointmentChanges, NewAppointment},
        barber::{Barber, BarberChanges},
        service::{Service, ServiceDraft, ServiceFilter},
    },
    scheduling::{grid::SlotLabel, placement::PlacementCheck},
    store::{AppointmentStore, Directory},
};
use chrono::{DateTime, NaiveDate, Utc};
use mockall::mock;
use uuid::Uuid;

// Mock stores for testing failure paths
mock! {
    pub Appointments {}

    #[async_trait]
    impl AppointmentStore for Appointments {
        async fn list_appointments(
            &self,
            barber_id: Uuid,
            date: NaiveDate,
        ) -> BookingResult<Vec<Appointment>>;

        async fn get_appointment(
            &self,
            id: Uuid,
        ) -> BookingResult<Option<Appointment>>;

        async fn insert_appointment(
            &self,
            new: &NewAppointment,
            check: &PlacementCheck,
        ) -> BookingResult<Appointment>;

        async fn update_appointment(
            &self,
            id: Uuid,
            changes: &AppointmentChanges,
            check: &PlacementCheck,
        ) -> BookingResult<Appointment>;

        async fn cancel_appointment(
            &self,
            id: Uuid,
            canceled_at: DateTime<Utc>,
        ) -> BookingResult<Appointment>;

        async fn cancel_blocks_at(
            &self,
            barber_id: Uuid,
            date: NaiveDate,
            time: SlotLabel,
            canceled_at: DateTime<Utc>,
        ) -> BookingResult<Vec<Uuid>>;

        async fn find_by_phone(
            &self,
            phone: &str,
        ) -> BookingResult<Vec<Appointment>>;
    }
}

mock! {
    pub DirectoryStore {}

    #[async_trait]
    impl Directory for DirectoryStore {
        async fn list_barbers(&self) -> BookingResult<Vec<Barber>>;

        async fn get_barber(
            &self,
            id: Uuid,
        ) -> BookingResult<Option<Barber>>;

        async fn create_barber(
            &self,
            name: &str,
        ) -> BookingResult<Barber>;

        async fn update_barber(
            &self,
            id: Uuid,
            changes: &BarberChanges,
        ) -> BookingResult<Barber>;

        async fn delete_barber(
            &self,
            id: Uuid,
        ) -> BookingResult<()>;

        async fn set_barber_services(
            &self,
            barber_id: Uuid,
            service_ids: Vec<Uuid>,
        ) -> BookingResult<()>;

        async fn list_services(
            &self,
            filter: &ServiceFilter,
        ) -> BookingResult<Vec<Service>>;

        async fn get_service(
            &self,
            id: Uuid,
        ) -> BookingResult<Option<Service>>;

        async fn create_service(
            &self,
            draft: &ServiceDraft,
        ) -> BookingResult<Service>;

        async fn update_service(
            &self,
            id: Uuid,
            draft: &ServiceDraft,
        ) -> BookingResult<Service>;

        async fn delete_service(
            &self,
            id: Uuid,
        ) -> BookingResult<()>;
    }
}
