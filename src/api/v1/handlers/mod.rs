pub mod health;
pub mod operators;
pub mod sys_users;
