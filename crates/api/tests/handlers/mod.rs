mod admin_test;
mod appointments_test;
mod availability_test;
mod directory_test;
mod middleware_test;
