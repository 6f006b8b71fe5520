use crate::core::config::data::{Config, BACKEND_URL_ENV};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.backend_url {
            Some(url) => println!("  backend-url: {url}"),
            None => println!("  backend-url: (unset)"),
        }
        match &self.start_route {
            Some(route) => println!("  start-route: {route}"),
            None => println!("  start-route: (unset)"),
        }
        if let Ok(value) = std::env::var(BACKEND_URL_ENV) {
            if !value.trim().is_empty() {
                println!("  {BACKEND_URL_ENV} overrides backend-url: {}", value.trim());
            }
        }
        println!("  api base: {}", self.api_base());
    }
}
