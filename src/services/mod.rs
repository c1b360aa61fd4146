pub mod investment_service;
