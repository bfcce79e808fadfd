pub mod aes_encryption_service;
