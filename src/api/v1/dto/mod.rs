pub mod sys_users;
