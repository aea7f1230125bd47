mod dashboard;
mod health_check;
mod helpers;
mod subscribers;
