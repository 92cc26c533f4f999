pub mod application {
    pub mod auth_service;
    pub mod booking_service;
    pub mod place_service;
}

pub mod data {
    pub mod memory;
    pub mod mongo;
}

pub mod domain {
    pub mod booking;
    pub mod error;
    pub mod place;
    pub mod repository;
    pub mod user;
}

pub mod infrastructure {
    pub mod config;
    pub mod logging;
    pub mod media;
    pub mod security;
}

pub mod presentation {
    pub mod auth;
    pub mod error;
    pub mod handlers;
    pub mod middleware;
    pub mod routes;
    pub mod uploads;
}
