//! Unit and service tests for the notification module.

mod dispatch_tests;
