mod common;




#[cfg(test)]
mod test_fainting;

#[cfg(test)]
mod test_session;
