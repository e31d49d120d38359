/*
 * Responsibility
 * - データアクセスの契約 (Repository<T>) と、その実装
 */
pub mod base;
pub mod error;
pub mod sys_user_repo;
